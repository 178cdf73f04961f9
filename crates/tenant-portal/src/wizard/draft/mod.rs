//! Draft persistence: keeps an in-progress application recoverable across reloads.

mod codec;
mod rehydrate;
mod storage;

pub use codec::{DraftCodec, DraftError, LoadedDraft, PersistedDraft, DEFAULT_DRAFT_KEY};
pub use rehydrate::{rehydrate_dates, DateField, RehydrateError};
pub use storage::{DraftStorage, FileDraftStorage, MemoryDraftStorage, StorageError};
