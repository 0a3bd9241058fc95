use parking_lot::Mutex;

/// Data waiting to be uploaded to a GPU resource.
///
/// The payload can only be installed by the constructor, before the owning
/// resource is shared, and is handed out exactly once by [`take`]. After
/// that the resource is never pending again, so of all the models sharing a
/// resource only the first to materialize it performs the upload.
///
/// [`take`]: PendingUpload::take
pub struct PendingUpload<T> {
    data: Mutex<Option<T>>,
}

impl<T> PendingUpload<T> {
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            data: Mutex::new(Some(data)),
        }
    }

    /// Removes the payload. Returns `None` if it was already taken.
    pub fn take(&self) -> Option<T> {
        self.data.lock().take()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.data.lock().is_some()
    }
}

impl<T> std::fmt::Debug for PendingUpload<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingUpload")
            .field("pending", &self.is_pending())
            .finish()
    }
}
