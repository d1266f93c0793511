//! Photo textures reported by the host page
//!
//! The host fetches and decodes each photo and reports either the RGBA pixels or
//! the failure. Failures never surface past this module: the slot switches to a
//! generated placeholder and a "FILE MISSING" label.

mod placeholder;

pub use placeholder::{placeholder_image, PLACEHOLDER_SIZE};

use crate::config::PhotoEntry;
use crate::error::AssetLoadError;

/// Label shown under a photo whose file could not be loaded
pub const MISSING_LABEL: &str = "FILE MISSING";

/// Largest accepted texture edge
pub const MAX_TEXTURE_SIZE: u32 = 8192;

/// Decoded RGBA8 image
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoTexture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PhotoTexture {
    /// Wrap host-supplied pixels, checking the buffer matches the dimensions
    pub fn from_rgba(path: &str, pixels: Vec<u8>, width: u32, height: u32) -> Result<Self, AssetLoadError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4));
        let valid = width > 0
            && height > 0
            && width <= MAX_TEXTURE_SIZE
            && height <= MAX_TEXTURE_SIZE
            && expected == Some(pixels.len());

        if !valid {
            return Err(AssetLoadError::Dimensions {
                path: path.to_string(),
                width,
                height,
                len: pixels.len(),
            });
        }

        Ok(Self { width, height, pixels })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhotoStatus {
    Pending,
    Loaded,
    Missing(AssetLoadError),
}

static PENDING: PhotoStatus = PhotoStatus::Pending;

#[derive(Debug, Clone)]
struct PhotoSlot {
    url: String,
    status: PhotoStatus,
    texture: Option<PhotoTexture>,
    /// Texture changed since the renderer last took it
    dirty: bool,
}

/// Per-photo texture state, indexed by photo id
#[derive(Debug, Clone, Default)]
pub struct PhotoStore {
    slots: Vec<PhotoSlot>,
}

impl PhotoStore {
    pub fn new(entries: &[PhotoEntry]) -> Self {
        let slots = entries
            .iter()
            .map(|e| PhotoSlot {
                url: e.url.clone(),
                status: PhotoStatus::Pending,
                texture: None,
                dirty: false,
            })
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn url(&self, id: usize) -> Option<&str> {
        self.slots.get(id).map(|s| s.url.as_str())
    }

    pub fn status(&self, id: usize) -> Option<&PhotoStatus> {
        self.slots.get(id).map(|s| &s.status)
    }

    pub fn texture(&self, id: usize) -> Option<&PhotoTexture> {
        self.slots.get(id).and_then(|s| s.texture.as_ref())
    }

    /// Label to draw under the photo, if any
    pub fn label(&self, id: usize) -> Option<&'static str> {
        match self.status(id) {
            Some(PhotoStatus::Missing(_)) => Some(MISSING_LABEL),
            _ => None,
        }
    }

    /// Accept decoded pixels from the host. Invalid buffers fall back to the placeholder.
    pub fn loaded(&mut self, id: usize, pixels: Vec<u8>, width: u32, height: u32) -> &PhotoStatus {
        let Some(url) = self.url(id).map(str::to_string) else {
            log::warn!("{}", AssetLoadError::UnknownPhoto(id));
            return &PENDING;
        };

        match PhotoTexture::from_rgba(&url, pixels, width, height) {
            Ok(texture) => {
                log::info!("photo {} loaded ({}x{})", url, width, height);
                let slot = &mut self.slots[id];
                slot.texture = Some(texture);
                slot.status = PhotoStatus::Loaded;
                slot.dirty = true;
                &slot.status
            }
            Err(err) => self.fail(id, err),
        }
    }

    /// Record a failed fetch reported by the host
    pub fn fetch_failed(&mut self, id: usize, reason: &str) -> &PhotoStatus {
        let path = self.url(id).unwrap_or_default().to_string();
        self.fail(id, AssetLoadError::Network { path, reason: reason.to_string() })
    }

    /// Record an image the host fetched but could not decode
    pub fn decode_failed(&mut self, id: usize, reason: &str) -> &PhotoStatus {
        let path = self.url(id).unwrap_or_default().to_string();
        self.fail(id, AssetLoadError::Decode { path, reason: reason.to_string() })
    }

    fn fail(&mut self, id: usize, err: AssetLoadError) -> &PhotoStatus {
        let Some(slot) = self.slots.get_mut(id) else {
            log::warn!("{}", AssetLoadError::UnknownPhoto(id));
            return &PENDING;
        };

        log::warn!("{}. Showing placeholder.", err);
        slot.texture = Some(placeholder_image(&slot.url));
        slot.status = PhotoStatus::Missing(err);
        slot.dirty = true;
        &slot.status
    }

    /// Ids whose texture changed since the last call
    fn take_dirty(&mut self) -> Vec<usize> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(id, slot)| {
                if slot.dirty {
                    slot.dirty = false;
                    Some(id)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Hand every changed texture to `upload`. A failed upload is logged and
    /// does not hold back the other photos. Returns the number of failures.
    pub fn upload_dirty<F>(&mut self, mut upload: F) -> usize
    where
        F: FnMut(usize, &PhotoTexture) -> Result<(), String>,
    {
        let mut failures = 0;
        for id in self.take_dirty() {
            let Some(texture) = self.texture(id) else {
                continue;
            };
            if let Err(e) = upload(id, texture) {
                log::warn!("photo {} texture upload failed: {}", id, e);
                failures += 1;
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PhotoStore {
        PhotoStore::new(&[
            PhotoEntry::new("a", "photos/a.jpg"),
            PhotoEntry::new("b", "photos/b.jpg"),
        ])
    }

    #[test]
    fn test_starts_pending() {
        let s = store();
        assert_eq!(s.len(), 2);
        assert_eq!(s.status(0), Some(&PhotoStatus::Pending));
        assert!(s.texture(0).is_none());
        assert_eq!(s.label(0), None);
    }

    #[test]
    fn test_successful_load() {
        let mut s = store();
        let status = s.loaded(1, vec![255; 2 * 3 * 4], 2, 3).clone();
        assert_eq!(status, PhotoStatus::Loaded);
        assert_eq!(s.texture(1).map(|t| (t.width, t.height)), Some((2, 3)));
        assert_eq!(s.take_dirty(), vec![1]);
        assert!(s.take_dirty().is_empty());
    }

    #[test]
    fn test_network_failure_uses_placeholder() {
        let mut s = store();
        s.fetch_failed(0, "404 Not Found");
        assert!(matches!(s.status(0), Some(PhotoStatus::Missing(AssetLoadError::Network { .. }))));
        assert_eq!(s.label(0), Some(MISSING_LABEL));
        let tex = s.texture(0).unwrap();
        assert_eq!(tex.width, PLACEHOLDER_SIZE);
    }

    #[test]
    fn test_bad_dimensions_fall_back() {
        let mut s = store();
        s.loaded(0, vec![0; 10], 4, 4);
        assert!(matches!(s.status(0), Some(PhotoStatus::Missing(AssetLoadError::Dimensions { .. }))));
        assert_eq!(s.texture(0).unwrap().width, PLACEHOLDER_SIZE);

        s.loaded(1, Vec::new(), 0, 0);
        assert_eq!(s.label(1), Some(MISSING_LABEL));
    }

    #[test]
    fn test_decode_failure() {
        let mut s = store();
        s.decode_failed(1, "not an image");
        assert!(matches!(s.status(1), Some(PhotoStatus::Missing(AssetLoadError::Decode { .. }))));
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let mut s = store();
        assert_eq!(s.loaded(9, vec![0; 4], 1, 1), &PhotoStatus::Pending);
        assert_eq!(s.fetch_failed(9, "gone"), &PhotoStatus::Pending);
        assert!(s.take_dirty().is_empty());
    }

    #[test]
    fn test_failed_upload_does_not_skip_later_photos() {
        let mut s = PhotoStore::new(&[
            PhotoEntry::new("a", "photos/a.jpg"),
            PhotoEntry::new("b", "photos/b.jpg"),
            PhotoEntry::new("c", "photos/c.jpg"),
        ]);
        s.loaded(0, vec![0; 4], 1, 1);
        s.fetch_failed(1, "404 Not Found");
        s.loaded(2, vec![0; 4], 1, 1);

        let mut uploaded = Vec::new();
        let failures = s.upload_dirty(|id, _| {
            if id == 0 {
                return Err("out of memory".to_string());
            }
            uploaded.push(id);
            Ok(())
        });
        assert_eq!(failures, 1);
        assert_eq!(uploaded, vec![1, 2]);
    }

    #[test]
    fn test_error_messages() {
        let err = PhotoTexture::from_rgba("p.jpg", vec![0; 3], 1, 1).unwrap_err();
        assert!(err.to_string().contains("p.jpg"));
    }
}
