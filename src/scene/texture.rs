use std::sync::Arc;

/// Decoded RGBA8 image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self { width, height, rgba }
    }

    /// Single opaque pixel
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self::new(1, 1, rgba.to_vec())
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Handle to a texture slot in a [`TextureRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(usize);

impl TextureId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub enum TextureState {
    Pending,
    Ready(Arc<TextureData>),
    Failed,
}

#[derive(Debug, Clone)]
pub struct TextureSlot {
    pub label: String,
    pub state: TextureState,
    /// Bumped whenever the slot's image is replaced
    pub generation: u64,
}

/// Texture slots referenced by materials; a slot's image is swapped in once loaded
#[derive(Debug, Default)]
pub struct TextureRegistry {
    slots: Vec<TextureSlot>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a slot whose image arrives later
    pub fn reserve(&mut self, label: impl Into<String>) -> TextureId {
        self.slots.push(TextureSlot {
            label: label.into(),
            state: TextureState::Pending,
            generation: 0,
        });
        TextureId(self.slots.len() - 1)
    }

    pub fn insert(&mut self, label: impl Into<String>, data: TextureData) -> TextureId {
        let id = self.reserve(label);
        self.fulfill(id, data);
        id
    }

    pub fn fulfill(&mut self, id: TextureId, data: TextureData) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.state = TextureState::Ready(Arc::new(data));
            slot.generation += 1;
        }
    }

    pub fn fail(&mut self, id: TextureId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.state = TextureState::Failed;
        }
    }

    pub fn get(&self, id: TextureId) -> Option<&TextureSlot> {
        self.slots.get(id.0)
    }

    /// Image for the slot if it has finished loading
    pub fn ready(&self, id: TextureId) -> Option<(&Arc<TextureData>, u64)> {
        match self.slots.get(id.0) {
            Some(TextureSlot {
                state: TextureState::Ready(data),
                generation,
                ..
            }) => Some((data, *generation)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s.state, TextureState::Pending))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_then_fulfill() {
        let mut registry = TextureRegistry::new();
        let id = registry.reserve("earth.jpg");
        assert!(registry.ready(id).is_none());
        assert_eq!(registry.pending_count(), 1);

        registry.fulfill(id, TextureData::solid([255, 0, 0, 255]));
        let (data, generation) = registry.ready(id).unwrap();
        assert_eq!(data.rgba, vec![255, 0, 0, 255]);
        assert_eq!(generation, 1);
        assert_eq!(registry.pending_count(), 0);
    }

    #[test]
    fn test_fail_marks_slot() {
        let mut registry = TextureRegistry::new();
        let id = registry.reserve("missing.png");
        registry.fail(id);
        assert!(matches!(registry.get(id).unwrap().state, TextureState::Failed));
        assert!(registry.ready(id).is_none());
    }

    #[test]
    fn test_aspect() {
        assert_eq!(TextureData::new(200, 100, vec![0; 200 * 100 * 4]).aspect(), 2.0);
        assert_eq!(TextureData::new(0, 0, vec![]).aspect(), 1.0);
    }
}
