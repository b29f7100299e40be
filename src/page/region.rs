//! Regions of the page that views are mounted into

use parking_lot::Mutex;

/// An element whose whole content is replaced on every mount
pub trait ContentRegion: Send + Sync {
    /// Replace the content with `html`
    fn mount(&self, html: String);

    /// Hide the region
    fn hide(&self) {
        self.mount(String::new());
    }
}

/// Region that keeps its content in memory
#[derive(Debug, Default)]
pub struct BufferRegion {
    inner: Mutex<BufferState>,
}

#[derive(Debug, Default)]
struct BufferState {
    content: String,
    mounts: usize,
}

impl BufferRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content currently mounted
    pub fn content(&self) -> String {
        self.inner.lock().content.clone()
    }

    /// How many times content was mounted
    pub fn mounts(&self) -> usize {
        self.inner.lock().mounts
    }
}

impl ContentRegion for BufferRegion {
    fn mount(&self, html: String) {
        let mut state = self.inner.lock();
        state.content = html;
        state.mounts += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_replaces_content() {
        let region = BufferRegion::new();
        region.mount("<p>one</p>".to_string());
        region.mount("<p>two</p>".to_string());

        assert_eq!(region.content(), "<p>two</p>");
        assert_eq!(region.mounts(), 2);

        region.hide();
        assert_eq!(region.content(), "");
    }
}
