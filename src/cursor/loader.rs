//! Per-handle cache of decoded cursors.
//!
//! The pointer rarely changes between frames, so the common lookup is a
//! hash hit on the handle. Decoding only happens on a miss, or on every
//! lookup when caching is switched off.

use super::decode::{decode, DecodedCursor};
use super::shape::SystemCursor;
use super::source::CursorSource;
use super::CursorHandle;
use crate::config::LoaderConfig;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Loader behind a lock, for callers that poll from more than one thread.
pub type SharedCursorLoader<S> = Arc<Mutex<CursorLoader<S>>>;

/// Read and decode a single handle, without touching any cache.
///
/// Every failure (stale handle, missing mask, malformed bitmap) is logged
/// and reported as `None`.
pub fn decode_handle<S: CursorSource + ?Sized>(
    source: &S,
    handle: CursorHandle,
) -> Option<DecodedCursor> {
    if handle.is_null() {
        return None;
    }

    match source.read_cursor(handle).and_then(|raw| decode(&raw)) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            log::debug!("[CURSOR] Could not decode cursor {}: {}", handle, err);
            None
        },
    }
}

/// Cursor decoder with bitmap caching.
///
/// Owns every decoded bitmap it hands out; callers get shared read-only
/// views. Entries live until [`dispose`](Self::dispose) (or drop).
pub struct CursorLoader<S: CursorSource> {
    source: S,
    config: LoaderConfig,
    cache: HashMap<CursorHandle, Arc<DecodedCursor>>,
    system_shapes: HashMap<CursorHandle, SystemCursor>,
    disposed: bool,
}

impl<S: CursorSource> CursorLoader<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, LoaderConfig::default())
    }

    /// Create a loader, warming it with the system cursors if configured to.
    pub fn with_config(source: S, config: LoaderConfig) -> Self {
        let mut loader = Self {
            source,
            config,
            cache: HashMap::new(),
            system_shapes: HashMap::new(),
            disposed: false,
        };
        if loader.config.preload_system_cursors {
            loader.preload_system_cursors();
        }
        loader
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn caching_enabled(&self) -> bool {
        self.config.caching_enabled
    }

    /// Toggle whether lookups consult and populate the cache.
    /// Existing entries are kept either way.
    pub fn set_caching_enabled(&mut self, enabled: bool) {
        log::debug!("[CURSOR] set_caching_enabled({})", enabled);
        self.config.caching_enabled = enabled;
    }

    /// Look up `handle`, decoding it on a cache miss.
    pub fn get(&mut self, handle: CursorHandle) -> Option<Arc<DecodedCursor>> {
        if self.disposed {
            log::warn!("[CURSOR] Lookup of {} on a disposed loader", handle);
            return None;
        }

        if self.config.caching_enabled {
            if let Some(cached) = self.cache.get(&handle) {
                return Some(Arc::clone(cached));
            }
        }

        let decoded = Arc::new(decode_handle(&self.source, handle)?);

        if self.config.caching_enabled {
            log::debug!(
                "[CURSOR] Caching cursor: handle={}, size={}x{}, hotspot=({},{})",
                handle,
                decoded.width,
                decoded.height,
                decoded.hotspot_x,
                decoded.hotspot_y
            );
            self.cache.insert(handle, Arc::clone(&decoded));
        }

        Some(decoded)
    }

    /// Look up whatever cursor the OS is showing right now.
    pub fn get_current(&mut self) -> Option<Arc<DecodedCursor>> {
        if self.disposed {
            log::warn!("[CURSOR] Current cursor requested on a disposed loader");
            return None;
        }

        let handle = match self.source.current_cursor() {
            Ok(Some(handle)) if !handle.is_null() => handle,
            Ok(_) => return None,
            Err(err) => {
                log::debug!("[CURSOR] Could not query current cursor: {}", err);
                return None;
            },
        };

        self.get(handle)
    }

    /// Decode and store each handle regardless of the caching switch.
    ///
    /// Handles that fail to decode are skipped. Returns how many were stored.
    pub fn preload<I>(&mut self, handles: I) -> usize
    where
        I: IntoIterator<Item = CursorHandle>,
    {
        if self.disposed {
            return 0;
        }

        let mut loaded = 0;
        for handle in handles {
            if let Some(decoded) = decode_handle(&self.source, handle) {
                self.cache.insert(handle, Arc::new(decoded));
                loaded += 1;
            }
        }
        loaded
    }

    /// Preload every [`SystemCursor`] the source can resolve.
    pub fn preload_system_cursors(&mut self) -> usize {
        if self.disposed {
            return 0;
        }

        let resolved: Vec<(SystemCursor, CursorHandle)> = SystemCursor::ALL
            .into_iter()
            .filter_map(|shape| self.source.system_cursor(shape).map(|handle| (shape, handle)))
            .collect();

        for &(shape, handle) in &resolved {
            self.system_shapes.insert(handle, shape);
        }

        let loaded = self.preload(resolved.into_iter().map(|(_, handle)| handle));
        log::info!(
            "[CURSOR] Preloaded {}/{} system cursors",
            loaded,
            SystemCursor::ALL.len()
        );
        loaded
    }

    /// Which system shape `handle` was resolved from during preloading.
    pub fn system_shape(&self, handle: CursorHandle) -> Option<SystemCursor> {
        self.system_shapes.get(&handle).copied()
    }

    pub fn contains(&self, handle: CursorHandle) -> bool {
        self.cache.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Number of pixel buffers currently held by the cache.
    pub fn cached_buffer_count(&self) -> usize {
        self.cache
            .values()
            .map(|cursor| cursor.pixel_buffer_count())
            .sum()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release every cached bitmap. Further lookups return `None`.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        let released = self.cached_buffer_count();
        self.cache.clear();
        self.cache.shrink_to_fit();
        self.system_shapes.clear();
        self.disposed = true;

        log::debug!("[CURSOR] Disposed loader, released {} pixel buffers", released);
    }

    pub fn into_shared(self) -> SharedCursorLoader<S> {
        Arc::new(Mutex::new(self))
    }
}

impl<S: CursorSource> Drop for CursorLoader<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::bitmap::RawCursor;
    use crate::cursor::decode::tests::{monochrome_cursor, solid_cursor};
    use crate::cursor::CursorEncoding;
    use crate::error::{CursorError, CursorResult};
    use std::cell::Cell;

    const ARROW: CursorHandle = CursorHandle::from_raw(0x10003);
    const IBEAM: CursorHandle = CursorHandle::from_raw(0x10005);
    const LEGACY: CursorHandle = CursorHandle::from_raw(0x2001f);
    const STALE: CursorHandle = CursorHandle::from_raw(0xdead);

    /// In-memory source that counts how often it is asked to read.
    #[derive(Default)]
    struct FakeSource {
        cursors: HashMap<CursorHandle, RawCursor>,
        system: HashMap<SystemCursor, CursorHandle>,
        current: Option<CursorHandle>,
        reads: Cell<usize>,
    }

    impl FakeSource {
        fn standard() -> Self {
            let mut source = Self::default();
            source.cursors.insert(ARROW, solid_cursor(0, 0, 0));
            source.cursors.insert(IBEAM, solid_cursor(255, 255, 255));
            source.cursors.insert(LEGACY, monochrome_cursor());
            source
        }

        fn reads(&self) -> usize {
            self.reads.get()
        }
    }

    impl CursorSource for FakeSource {
        fn current_cursor(&self) -> CursorResult<Option<CursorHandle>> {
            Ok(self.current)
        }

        fn system_cursor(&self, cursor: SystemCursor) -> Option<CursorHandle> {
            self.system.get(&cursor).copied()
        }

        fn read_cursor(&self, handle: CursorHandle) -> CursorResult<RawCursor> {
            self.reads.set(self.reads.get() + 1);
            self.cursors
                .get(&handle)
                .cloned()
                .ok_or(CursorError::InvalidHandle(handle))
        }
    }

    #[test]
    fn test_cached_lookup_decodes_once() {
        let mut loader = CursorLoader::new(FakeSource::standard());

        let first = loader.get(ARROW).unwrap();
        let second = loader.get(ARROW).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
        assert_eq!(loader.source().reads(), 1);
        assert!(loader.contains(ARROW));
    }

    #[test]
    fn test_disabled_cache_decodes_every_time() {
        let config = LoaderConfig {
            caching_enabled: false,
            ..LoaderConfig::default()
        };
        let mut loader = CursorLoader::with_config(FakeSource::standard(), config);

        let first = loader.get(ARROW).unwrap();
        let second = loader.get(ARROW).unwrap();

        assert_eq!(loader.source().reads(), 2);
        assert_eq!(*first, *second);
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(loader.is_empty());
    }

    #[test]
    fn test_disabling_cache_keeps_entries() {
        let mut loader = CursorLoader::new(FakeSource::standard());
        loader.get(ARROW).unwrap();

        loader.set_caching_enabled(false);
        assert!(!loader.caching_enabled());
        assert_eq!(loader.len(), 1);
        loader.get(ARROW).unwrap();
        assert_eq!(loader.source().reads(), 2);

        loader.set_caching_enabled(true);
        loader.get(ARROW).unwrap();
        assert_eq!(loader.source().reads(), 2);
    }

    #[test]
    fn test_invalid_handle_is_never_cached() {
        let mut loader = CursorLoader::new(FakeSource::standard());

        assert!(loader.get(STALE).is_none());
        assert!(loader.get(STALE).is_none());
        assert!(loader.is_empty());
        assert_eq!(loader.source().reads(), 2);

        assert!(loader.get(CursorHandle::from_raw(0)).is_none());
        assert_eq!(loader.source().reads(), 2);
    }

    #[test]
    fn test_current_cursor_absent_skips_decoding() {
        let mut loader = CursorLoader::new(FakeSource::standard());

        assert!(loader.get_current().is_none());
        assert_eq!(loader.source().reads(), 0);
    }

    #[test]
    fn test_current_cursor_delegates_to_cache() {
        let mut source = FakeSource::standard();
        source.current = Some(LEGACY);
        let mut loader = CursorLoader::new(source);

        let current = loader.get_current().unwrap();
        assert_eq!(current.encoding, CursorEncoding::Monochrome);
        assert!(current.invert_image.is_some());

        loader.get_current().unwrap();
        assert_eq!(loader.source().reads(), 1);
    }

    #[test]
    fn test_preload_skips_failures_and_ignores_cache_switch() {
        let config = LoaderConfig {
            caching_enabled: false,
            ..LoaderConfig::default()
        };
        let mut loader = CursorLoader::with_config(FakeSource::standard(), config);

        let loaded = loader.preload([ARROW, STALE, LEGACY]);

        assert_eq!(loaded, 2);
        assert_eq!(loader.len(), 2);
        assert!(loader.contains(ARROW));
        assert!(!loader.contains(STALE));
    }

    #[test]
    fn test_preload_system_cursors_records_shapes() {
        let mut source = FakeSource::standard();
        source.system.insert(SystemCursor::Arrow, ARROW);
        source.system.insert(SystemCursor::IBeam, IBEAM);
        source.system.insert(SystemCursor::Wait, STALE);

        let mut loader = CursorLoader::new(source);
        assert_eq!(loader.preload_system_cursors(), 2);

        assert_eq!(loader.len(), 2);
        assert_eq!(loader.system_shape(ARROW), Some(SystemCursor::Arrow));
        assert_eq!(loader.system_shape(IBEAM), Some(SystemCursor::IBeam));
        assert_eq!(loader.system_shape(LEGACY), None);

        // Served from the cache afterwards
        loader.get(IBEAM).unwrap();
        assert_eq!(loader.source().reads(), 3);
    }

    #[test]
    fn test_config_preloads_on_construction() {
        let mut source = FakeSource::standard();
        source.system.insert(SystemCursor::Hand, IBEAM);
        let config = LoaderConfig {
            preload_system_cursors: true,
            ..LoaderConfig::default()
        };

        let loader = CursorLoader::with_config(source, config);
        assert!(loader.contains(IBEAM));
        assert_eq!(loader.system_shape(IBEAM), Some(SystemCursor::Hand));
    }

    #[test]
    fn test_dispose_releases_everything() {
        let mut loader = CursorLoader::new(FakeSource::standard());
        loader.get(ARROW).unwrap();
        loader.get(LEGACY).unwrap();
        assert_eq!(loader.cached_buffer_count(), 3);

        loader.dispose();
        assert!(loader.is_disposed());
        assert_eq!(loader.cached_buffer_count(), 0);
        assert!(loader.is_empty());

        // Second dispose is a no-op
        loader.dispose();
        assert!(loader.get(ARROW).is_none());
        assert_eq!(loader.preload([ARROW]), 0);
        assert_eq!(loader.source().reads(), 2);
    }

    #[test]
    fn test_handed_out_cursor_outlives_dispose() {
        let mut loader = CursorLoader::new(FakeSource::standard());
        let arrow = loader.get(ARROW).unwrap();
        loader.dispose();
        assert_eq!(arrow.width, 32);
        assert_eq!(Arc::strong_count(&arrow), 1);
    }

    #[test]
    fn test_loader_over_borrowed_source() {
        let source = FakeSource::standard();
        {
            let mut loader = CursorLoader::new(&source);
            loader.get(IBEAM).unwrap();
            loader.get(IBEAM).unwrap();
        }
        assert_eq!(source.reads(), 1);
    }

    #[test]
    fn test_shared_loader_across_threads() {
        let shared = CursorLoader::new(FakeSource::standard()).into_shared();
        let worker = Arc::clone(&shared);

        let decoded = std::thread::spawn(move || worker.lock().get(ARROW).is_some())
            .join()
            .unwrap();

        assert!(decoded);
        assert!(shared.lock().contains(ARROW));
    }

    #[test]
    fn test_decode_handle_bypasses_cache() {
        let source = FakeSource::standard();
        let decoded = decode_handle(&source, IBEAM).unwrap();
        assert_eq!(decoded.primary_image.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert!(decode_handle(&source, STALE).is_none());
        assert_eq!(source.reads(), 2);
    }
}
