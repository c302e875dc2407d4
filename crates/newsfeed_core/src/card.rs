use crate::Article;

/// Converts one article into a renderable unit. The core never inspects the element.
pub trait CardRenderer {
    type Element;

    fn render(&self, article: &Article) -> Self::Element;

    fn render_all(&self, articles: &[Article]) -> Vec<Self::Element> {
        articles.iter().map(|article| self.render(article)).collect()
    }
}
