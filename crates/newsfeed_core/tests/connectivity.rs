use newsfeed_core::{Connectivity, ConnectivityMonitor, Transition};

#[test]
fn startup_offline_is_reported() {
    let mut monitor = ConnectivityMonitor::default();
    assert_eq!(monitor.initialize(false), Some(Transition::StartedOffline));
    assert_eq!(monitor.state(), Connectivity::Offline);

    let mut monitor = ConnectivityMonitor::default();
    assert_eq!(monitor.initialize(true), None);
    assert!(monitor.is_online());
}

#[test]
fn every_change_is_a_transition_and_repeats_are_not() {
    let mut monitor = ConnectivityMonitor::new(true);
    let observed: Vec<_> = [true, false, false, true, false, true, true]
        .into_iter()
        .map(|online| monitor.observe(online))
        .collect();

    assert_eq!(
        observed,
        vec![
            None,
            Some(Transition::WentOffline),
            None,
            Some(Transition::WentOnline),
            Some(Transition::WentOffline),
            Some(Transition::WentOnline),
            None,
        ]
    );
}
