//! Step bounds for reachability and reward queries.

/// How many steps a query looks ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Horizon {
    /// No step bound (fixed point of the linear system).
    #[default]
    Unbounded,
    /// At most this many steps (solved by unrolling).
    Steps(usize),
}

impl Horizon {
    /// Maps the command-line convention `0 = unbounded` to a horizon.
    pub fn from_steps(n: usize) -> Self {
        if n == 0 { Self::Unbounded } else { Self::Steps(n) }
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unbounded => f.write_str("unbounded"),
            Self::Steps(n) => write!(f, "{n} steps"),
        }
    }
}
