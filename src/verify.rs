use crate::error::VerifyError;
use crate::target::Target;
use crate::template::{HeaderTemplate, NonceEncoding};

/// Recompute the candidate hash for `nonce` and check it against a claimed result.
pub fn verify_solution(
    template: &HeaderTemplate,
    encoding: NonceEncoding,
    target: &Target,
    nonce: u32,
    claimed_hash: &[u8; 32],
) -> Result<(), VerifyError> {
    let hash = template.hash_nonce(nonce, encoding);
    if &hash != claimed_hash {
        return Err(VerifyError::HashMismatch);
    }
    if !target.is_met_by(&hash) {
        return Err(VerifyError::AboveTarget);
    }
    Ok(())
}
