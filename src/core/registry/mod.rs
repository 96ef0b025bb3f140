//! Local registry of cloned voices.
//!
//! The registry mirrors voice-clone metadata from the enrollment service into
//! a JSON file. The provider is always authoritative: listing and lookups copy
//! remote status back into the file. Remote calls are made outside the file
//! lock; each load-mutate-save cycle is serialized within the process.

mod base;
pub mod record;
pub mod store;

pub use base::{RegistryError, RegistryResult};
pub use record::{TargetModel, VoiceLookup, VoiceRecord, VoiceStatus};
pub use store::JsonStore;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::core::enrollment::{MAX_PAGE_SIZE, VoiceEnrollment};
use crate::utils::voice_prefix;

pub struct VoiceRegistry {
    enrollment: Arc<dyn VoiceEnrollment>,
    store: JsonStore,
    write_lock: Mutex<()>,
}

impl VoiceRegistry {
    /// Open the registry at `path`, creating an empty file if needed
    pub async fn open(
        path: impl Into<PathBuf>,
        enrollment: Arc<dyn VoiceEnrollment>,
    ) -> RegistryResult<Self> {
        let store = JsonStore::new(path);
        store.ensure_exists().await?;
        Ok(Self {
            enrollment,
            store,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Enroll a new voice from the sample at `audio_url` and record it as pending.
    ///
    /// A record already stored under the returned id is replaced.
    pub async fn create_voice(
        &self,
        target_model: TargetModel,
        name: &str,
        description: &str,
        audio_url: &str,
    ) -> RegistryResult<VoiceRecord> {
        let prefix = voice_prefix(name);
        let voice_id = self
            .enrollment
            .create_voice(target_model.as_str(), &prefix, audio_url)
            .await?;

        let record = VoiceRecord::pending(&voice_id, name, description, target_model, audio_url);

        let _guard = self.write_lock.lock().await;
        let mut records = self.store.load().await?;
        match records.iter_mut().find(|r| r.voice_id == voice_id) {
            Some(existing) => {
                warn!(voice_id = %voice_id, "Replacing existing record for voice");
                *existing = record.clone();
            }
            None => records.push(record.clone()),
        }
        self.store.save(&records).await?;

        info!(voice_id = %voice_id, prefix = %prefix, "Created voice");
        Ok(record)
    }

    /// All local records, with status and creation time refreshed from the
    /// first page of remote voices.
    ///
    /// Remote voices without a local record are not added.
    pub async fn list_voices(&self) -> RegistryResult<Vec<VoiceRecord>> {
        let remote = self.enrollment.list_voices(None, 0, MAX_PAGE_SIZE).await?;

        let _guard = self.write_lock.lock().await;
        let mut records = self.store.load().await?;
        for remote_voice in &remote {
            if let Some(local) = records
                .iter_mut()
                .find(|r| r.voice_id == remote_voice.voice_id)
            {
                local.refresh_status(remote_voice);
            }
        }
        self.store.save(&records).await?;

        Ok(records)
    }

    /// Look up a voice.
    ///
    /// Unknown ids return `None` without contacting the provider. For known
    /// ids the provider is queried once; if that fails the cached record is
    /// returned with `fresh == false`.
    pub async fn get_voice(&self, voice_id: &str) -> RegistryResult<Option<VoiceLookup>> {
        let cached = self
            .store
            .load()
            .await?
            .into_iter()
            .find(|r| r.voice_id == voice_id);
        let Some(cached) = cached else {
            return Ok(None);
        };

        let remote = match self.enrollment.query_voice(voice_id).await {
            Ok(remote) => remote,
            Err(e) => {
                warn!(voice_id = %voice_id, "Error querying voice, returning cached record: {}", e);
                return Ok(Some(VoiceLookup {
                    voice: cached,
                    fresh: false,
                }));
            }
        };

        let _guard = self.write_lock.lock().await;
        let mut records = self.store.load().await?;
        let voice = match records.iter_mut().find(|r| r.voice_id == voice_id) {
            Some(local) => {
                local.refresh_details(&remote);
                local.clone()
            }
            // deleted while the query was in flight
            None => {
                let mut voice = cached;
                voice.refresh_details(&remote);
                return Ok(Some(VoiceLookup { voice, fresh: true }));
            }
        };
        self.store.save(&records).await?;

        Ok(Some(VoiceLookup { voice, fresh: true }))
    }

    /// Re-train a voice from a new sample and record the new sample URL.
    ///
    /// Status is left as is. On a remote failure local state is untouched.
    pub async fn update_voice(&self, voice_id: &str, audio_url: &str) -> RegistryResult<()> {
        if let Err(e) = self.enrollment.update_voice(voice_id, audio_url).await {
            warn!(voice_id = %voice_id, "Error updating voice: {}", e);
            return Err(e.into());
        }

        let _guard = self.write_lock.lock().await;
        let mut records = self.store.load().await?;
        if let Some(local) = records.iter_mut().find(|r| r.voice_id == voice_id) {
            local.audio_url = audio_url.to_string();
        }
        self.store.save(&records).await?;
        Ok(())
    }

    /// Delete a voice remotely, then drop its local record
    pub async fn delete_voice(&self, voice_id: &str) -> RegistryResult<()> {
        if let Err(e) = self.enrollment.delete_voice(voice_id).await {
            warn!(voice_id = %voice_id, "Error deleting voice: {}", e);
            return Err(e.into());
        }

        let _guard = self.write_lock.lock().await;
        let mut records = self.store.load().await?;
        records.retain(|r| r.voice_id != voice_id);
        self.store.save(&records).await?;
        Ok(())
    }

    /// Local records as stored, without contacting the provider
    pub async fn cached_voices(&self) -> RegistryResult<Vec<VoiceRecord>> {
        self.store.load().await
    }
}
