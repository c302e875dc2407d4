#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    #[default]
    Online,
    Offline,
}

impl Connectivity {
    pub fn from_online(online: bool) -> Self {
        if online {
            Connectivity::Online
        } else {
            Connectivity::Offline
        }
    }
}

/// Connectivity changes the dispatcher must act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    StartedOffline,
    WentOnline,
    WentOffline,
}

/// Two-state online/offline tracker. No debouncing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectivityMonitor {
    state: Connectivity,
}

impl ConnectivityMonitor {
    pub fn new(online: bool) -> Self {
        Self {
            state: Connectivity::from_online(online),
        }
    }

    pub fn state(&self) -> Connectivity {
        self.state
    }

    pub fn is_online(&self) -> bool {
        self.state == Connectivity::Online
    }

    /// Resets the monitor from the environment at startup.
    pub fn initialize(&mut self, online: bool) -> Option<Transition> {
        self.state = Connectivity::from_online(online);
        (!online).then_some(Transition::StartedOffline)
    }

    /// Records an observation. Repeating the current state is not a transition.
    pub fn observe(&mut self, online: bool) -> Option<Transition> {
        let next = Connectivity::from_online(online);
        if next == self.state {
            return None;
        }
        self.state = next;
        Some(match next {
            Connectivity::Online => Transition::WentOnline,
            Connectivity::Offline => Transition::WentOffline,
        })
    }
}
