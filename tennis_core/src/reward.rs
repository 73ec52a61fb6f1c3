//! Coupon codes handed out for beating the bot.

use rand::Rng;

use crate::config::RewardConfig;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Host hook invoked with every freshly issued code
pub type RewardCallback = Box<dyn FnMut(&str)>;

/// Generates reward codes such as `TENNIS-4QZ81K-10OFF`
#[derive(Debug, Clone, PartialEq)]
pub struct RewardIssuer {
    config: RewardConfig,
}

impl RewardIssuer {
    pub fn new(config: RewardConfig) -> Self {
        RewardIssuer { config }
    }

    /// Generate a fresh code. Never cached: every call draws a new body.
    pub fn issue<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let suffix = self.config.suffix();
        let mut code = String::with_capacity(
            self.config.prefix.len() + self.config.code_length + suffix.len(),
        );

        code.push_str(&self.config.prefix);
        for _ in 0..self.config.code_length {
            code.push(BASE36[rng.gen_range(0..BASE36.len())] as char);
        }
        code.push_str(&suffix);
        code
    }

    /// Check that `code` has this issuer's shape
    pub fn is_well_formed(&self, code: &str) -> bool {
        let suffix = self.config.suffix();
        let Some(body) = code
            .strip_prefix(self.config.prefix.as_str())
            .and_then(|rest| rest.strip_suffix(suffix.as_str()))
        else {
            return false;
        };

        body.len() == self.config.code_length && body.bytes().all(|b| BASE36.contains(&b))
    }
}

impl Default for RewardIssuer {
    fn default() -> Self {
        RewardIssuer::new(RewardConfig::default())
    }
}
