//! The backend seam: credential issuance and verification plus the farmer
//! record collection.

use super::errors::StoreResult;
use super::models::{RecordUpdate, UserRecord};
use secrecy::SecretString;

/// Credential and record store the session machine talks to.
///
/// Every call is a blocking round trip. Implementations must not retry on
/// their own; the caller decides what a failure means.
pub trait FarmerStore {
    /// Registers a credential with the identity provider and returns its id.
    fn create_credential(&mut self, mobile: &str, secret: &SecretString) -> StoreResult<String>;

    /// Checks a credential and returns the matching record, or `None` when
    /// the credential is wrong or unknown.
    fn verify_credential(
        &mut self,
        mobile: &str,
        secret: &SecretString,
    ) -> StoreResult<Option<UserRecord>>;

    fn record_exists(&mut self, mobile: &str) -> StoreResult<bool>;

    /// Writes a new record. Fails with `AlreadyExists` if one is present.
    fn create_record(&mut self, mobile: &str, record: &UserRecord) -> StoreResult<()>;

    /// Merges `update` into an existing record. Fails with `NotFound` otherwise.
    fn update_record(&mut self, mobile: &str, update: &RecordUpdate) -> StoreResult<()>;

    fn get_record(&mut self, mobile: &str) -> StoreResult<Option<UserRecord>>;

    /// Short backend description for the developer panel.
    fn describe(&self) -> String;
}
