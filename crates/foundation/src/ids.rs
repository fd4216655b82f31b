/// Identifies one view activation. Tokens are minted in increasing order and
/// never reused, so a stale token can always be told apart from the live one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderToken(u64);

impl RenderToken {
    pub fn new(n: u64) -> Self {
        RenderToken(n)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RenderToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh [`RenderToken`]s.
#[derive(Debug, Default, Clone)]
pub struct TokenMint {
    next: u64,
}

impl TokenMint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self) -> RenderToken {
        self.next += 1;
        RenderToken(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::TokenMint;

    #[test]
    fn minted_tokens_are_distinct_and_ordered() {
        let mut mint = TokenMint::new();
        let a = mint.mint();
        let b = mint.mint();
        assert_ne!(a, b);
        assert!(a < b);
    }
}
