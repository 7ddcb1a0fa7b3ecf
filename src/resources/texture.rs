//! Asynchronous texture loading.
//!
//! [`TextureProvider::load`] hands out a [`TextureHandle`] right away and fetches
//! and decodes the image in the background: on the tokio runtime natively, in a
//! `spawn_local` task on the web. The decoded image comes back over a oneshot
//! channel which the render thread drains through [`TextureHandle::poll`]
//! without ever blocking.
//!
//! A texture that cannot be read or decoded ends up [`TextureState::Failed`].
//! That is logged once and otherwise only affects how the material looks.

use std::{cell::RefCell, collections::HashMap, fmt::Debug, rc::Rc};

use anyhow::Context;
use futures::channel::oneshot;

use crate::resources::load_binary;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureState {
    Pending,
    Loaded,
    Failed,
}

type Decoded = anyhow::Result<image::RgbaImage>;

enum Slot {
    Pending(oneshot::Receiver<Decoded>),
    Loaded(Rc<image::RgbaImage>),
    Failed,
}

impl Slot {
    fn state(&self) -> TextureState {
        match self {
            Slot::Pending(_) => TextureState::Pending,
            Slot::Loaded(_) => TextureState::Loaded,
            Slot::Failed => TextureState::Failed,
        }
    }
}

struct TextureSlot {
    path: String,
    slot: RefCell<Slot>,
}

/// Shared, cheaply clonable reference to one texture.
///
/// Clones compare equal; handles for different loads never do, even for
/// identical images.
#[derive(Clone)]
pub struct TextureHandle(Rc<TextureSlot>);

impl TextureHandle {
    fn pending(path: &str, receiver: oneshot::Receiver<Decoded>) -> Self {
        Self(Rc::new(TextureSlot {
            path: path.to_string(),
            slot: RefCell::new(Slot::Pending(receiver)),
        }))
    }

    pub fn path(&self) -> &str {
        &self.0.path
    }

    /// Picks up a finished load, if any, and returns the resulting state.
    pub fn poll(&self) -> TextureState {
        let mut slot = self.0.slot.borrow_mut();
        let next = match &mut *slot {
            Slot::Pending(receiver) => match receiver.try_recv() {
                Ok(None) => return TextureState::Pending,
                Ok(Some(Ok(image))) => {
                    log::debug!(
                        "texture {} decoded ({}x{})",
                        self.0.path,
                        image.width(),
                        image.height()
                    );
                    Slot::Loaded(Rc::new(image))
                }
                Ok(Some(Err(e))) => {
                    log::warn!("texture {} unavailable, using flat colour: {:#}", self.0.path, e);
                    Slot::Failed
                }
                Err(oneshot::Canceled) => {
                    log::warn!("texture {} was dropped before it finished loading", self.0.path);
                    Slot::Failed
                }
            },
            done => return done.state(),
        };
        *slot = next;
        slot.state()
    }

    /// State as of the last [`poll`](Self::poll).
    pub fn state(&self) -> TextureState {
        self.0.slot.borrow().state()
    }

    pub fn image(&self) -> Option<Rc<image::RgbaImage>> {
        match &*self.0.slot.borrow() {
            Slot::Loaded(image) => Some(Rc::clone(image)),
            _ => None,
        }
    }

    pub fn ptr_eq(&self, other: &TextureHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for TextureHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Debug for TextureHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureHandle")
            .field("path", &self.0.path)
            .field("state", &self.state())
            .finish()
    }
}

fn decode(bytes: &[u8], path: &str) -> Decoded {
    let image = image::load_from_memory(bytes).with_context(|| format!("could not decode {path}"))?;
    Ok(image.to_rgba8())
}

async fn fetch_and_decode(asset_root: String, path: String) -> Decoded {
    let bytes = load_binary(&asset_root, &path).await?;

    // Decoding is CPU bound and must not hold up the runtime's workers
    #[cfg(not(target_arch = "wasm32"))]
    return tokio::task::spawn_blocking(move || decode(&bytes, &path))
        .await
        .context("texture decode task panicked")?;

    #[cfg(target_arch = "wasm32")]
    decode(&bytes, &path)
}

/// Owns every texture of the application. Each path is requested exactly once.
pub struct TextureProvider {
    asset_root: String,
    #[cfg(not(target_arch = "wasm32"))]
    runtime: tokio::runtime::Handle,
    loaded: HashMap<String, TextureHandle>,
}

impl TextureProvider {
    pub fn new(
        asset_root: impl Into<String>,
        #[cfg(not(target_arch = "wasm32"))] runtime: tokio::runtime::Handle,
    ) -> Self {
        Self {
            asset_root: asset_root.into(),
            #[cfg(not(target_arch = "wasm32"))]
            runtime,
            loaded: HashMap::new(),
        }
    }

    /// Starts loading `path` and returns its handle without waiting.
    pub fn load(&mut self, path: &str) -> TextureHandle {
        if let Some(handle) = self.loaded.get(path) {
            return handle.clone();
        }
        let (sender, receiver) = oneshot::channel();
        let fut = fetch_and_decode(self.asset_root.clone(), path.to_string());
        let send = async move {
            // The receiver is gone only if the handle was dropped
            let _ = sender.send(fut.await);
        };

        #[cfg(not(target_arch = "wasm32"))]
        self.runtime.spawn(send);
        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(send);

        let handle = TextureHandle::pending(path, receiver);
        self.loaded.insert(path.to_string(), handle.clone());
        handle
    }

    pub fn handles(&self) -> impl Iterator<Item = &TextureHandle> {
        self.loaded.values()
    }

    pub fn asset_root(&self) -> &str {
        &self.asset_root
    }
}

impl Debug for TextureProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureProvider")
            .field("asset_root", &self.asset_root)
            .field("textures", &self.loaded.len())
            .finish()
    }
}

/// The ten textures of the cell.
#[derive(Clone, Debug)]
pub struct TextureSet {
    pub stone_wall: TextureHandle,
    pub concrete_floor: TextureHandle,
    pub iron_bar: TextureHandle,
    pub steel_frame: TextureHandle,
    pub window: TextureHandle,
    pub concrete_bedframe: TextureHandle,
    pub mattress: TextureHandle,
    pub concrete_pillow: TextureHandle,
    pub toilet: TextureHandle,
    pub bunkbed_pole: TextureHandle,
}

impl TextureSet {
    pub const PATHS: [&'static str; 10] = [
        "textures/stone_wall.jpg",
        "textures/concrete_floor.jpg",
        "textures/iron_bar.jpg",
        "textures/steel_frame.jpg",
        "textures/window_texture.jpg",
        "textures/concrete_bedframe.jpg",
        "textures/mattress_texture.jpg",
        "textures/concrete_pillow.jpg",
        "textures/toilet_texture.jpg",
        "textures/bunkbed_pole_texture.jpg",
    ];

    pub fn load(provider: &mut TextureProvider) -> Self {
        let [
            stone_wall,
            concrete_floor,
            iron_bar,
            steel_frame,
            window,
            concrete_bedframe,
            mattress,
            concrete_pillow,
            toilet,
            bunkbed_pole,
        ] = Self::PATHS.map(|path| provider.load(path));
        Self {
            stone_wall,
            concrete_floor,
            iron_bar,
            steel_frame,
            window,
            concrete_bedframe,
            mattress,
            concrete_pillow,
            toilet,
            bunkbed_pole,
        }
    }
}
