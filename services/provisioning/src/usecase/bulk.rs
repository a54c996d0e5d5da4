use futures::{StreamExt as _, stream};
use tracing::{error, info};

use crate::domain::repository::{IdentityStore, ProfileRepository};
use crate::domain::types::{AccountInput, BulkRecordResult, BulkStatus, BulkSummary};
use crate::error::ProvisionError;
use crate::usecase::provision::ProvisionAccountUseCase;

/// One record of a bulk request.
#[derive(Debug)]
pub enum BulkEntry {
    Ready(AccountInput),
    /// Failed before reaching either store, e.g. malformed or not permitted.
    Rejected {
        full_name: String,
        phone: String,
        error: ProvisionError,
    },
}

impl From<AccountInput> for BulkEntry {
    fn from(input: AccountInput) -> Self {
        Self::Ready(input)
    }
}

/// Provisions a list of accounts, one saga per record.
///
/// A failing record never aborts the batch. Results keep request order. With
/// `concurrency` of 1 records run strictly one after another.
pub struct BulkProvisionUseCase<I: IdentityStore, P: ProfileRepository> {
    pub provision: ProvisionAccountUseCase<I, P>,
    pub concurrency: usize,
    pub max_records: usize,
}

impl<I: IdentityStore, P: ProfileRepository> BulkProvisionUseCase<I, P> {
    pub async fn execute<E: Into<BulkEntry>>(
        &self,
        entries: Vec<E>,
    ) -> Result<BulkSummary, ProvisionError> {
        if entries.is_empty() {
            return Err(ProvisionError::validation("daftar akun kosong"));
        }
        if entries.len() > self.max_records {
            return Err(ProvisionError::validation(format!(
                "maksimal {} akun per unggahan",
                self.max_records
            )));
        }

        let total = entries.len();
        let results: Vec<BulkRecordResult> = stream::iter(entries.into_iter().enumerate())
            .map(|(index, entry)| self.provision_one(index, entry.into()))
            .buffered(self.concurrency.max(1))
            .collect()
            .await;

        let summary = BulkSummary::from_results(results);
        info!(
            total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "bulk provisioning finished"
        );
        Ok(summary)
    }

    async fn provision_one(&self, index: usize, entry: BulkEntry) -> BulkRecordResult {
        let (full_name, phone, outcome) = match entry {
            BulkEntry::Ready(input) => {
                let full_name = input.full_name.trim().to_owned();
                let phone = input.phone.trim().to_owned();
                (full_name, phone, self.provision.execute(input).await)
            }
            BulkEntry::Rejected {
                full_name,
                phone,
                error,
            } => (full_name, phone, Err(error)),
        };
        match outcome {
            Ok(profile) => BulkRecordResult {
                index,
                full_name,
                phone: profile.phone,
                status: BulkStatus::Created,
                account_id: Some(profile.id),
                kind: None,
                message: "akun berhasil dibuat".to_owned(),
            },
            Err(e) => {
                if e.status().is_server_error() {
                    error!(index, error = ?e, kind = e.kind(), "bulk record failed");
                }
                BulkRecordResult {
                    index,
                    full_name,
                    phone,
                    status: BulkStatus::Failed,
                    account_id: None,
                    kind: Some(e.kind()),
                    message: e.to_string(),
                }
            }
        }
    }
}
