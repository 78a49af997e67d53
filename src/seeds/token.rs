//! Pool token generation.

use rand_core::RngCore;
use std::collections::HashSet;

/// Random bytes per token. Tokens are the lowercase hex of these bytes.
pub const TOKEN_BYTES: usize = 16;

/// Attempts allowed per requested token before generation gives up.
pub const ATTEMPT_BUDGET_FACTOR: usize = 10;

/// Generation ran out of attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetExhausted {
    pub attempts: usize,
    pub generated: usize,
}

/// Draws one token.
pub fn random_token<R: RngCore + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Draws `count` tokens unique among themselves and absent from `existing`.
///
/// Gives up after `ATTEMPT_BUDGET_FACTOR * budget_base` draws. A healthy
/// CSPRNG never comes close; hitting the budget means the randomness
/// source is broken.
pub fn generate_unique<R: RngCore + ?Sized>(
    rng: &mut R,
    count: usize,
    existing: &HashSet<String>,
    budget_base: usize,
) -> Result<Vec<String>, BudgetExhausted> {
    let budget = budget_base.max(count) * ATTEMPT_BUDGET_FACTOR;
    let mut seen: HashSet<String> = HashSet::with_capacity(count);
    let mut tokens = Vec::with_capacity(count);
    let mut attempts = 0;

    while tokens.len() < count {
        if attempts >= budget {
            return Err(BudgetExhausted {
                attempts,
                generated: tokens.len(),
            });
        }
        attempts += 1;
        let token = random_token(rng);
        if existing.contains(&token) || !seen.insert(token.clone()) {
            tracing::trace!(attempts, "Token collision, redrawing");
            continue;
        }
        tokens.push(token);
    }

    Ok(tokens)
}
