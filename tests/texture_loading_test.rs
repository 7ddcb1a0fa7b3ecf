use cell_ngin::resources::texture::{TextureProvider, TextureSet, TextureState};

use crate::common::test_utils::{provider_without_assets, runtime, temp_dir, wait_for};

mod common;

#[test]
fn loading_a_path_twice_returns_the_same_handle() {
    let rt = runtime();
    let (_assets, mut provider) = provider_without_assets(&rt);
    let a = provider.load("textures/stone_wall.jpg");
    let b = provider.load("textures/stone_wall.jpg");
    let c = provider.load("textures/iron_bar.jpg");

    assert!(a.ptr_eq(&b));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(provider.handles().count(), 2);
}

#[test]
fn missing_file_ends_failed() {
    let rt = runtime();
    let (_assets, mut provider) = provider_without_assets(&rt);
    let handle = provider.load("textures/stone_wall.jpg");

    assert_eq!(wait_for(&handle), TextureState::Failed);
    assert!(handle.image().is_none());
    // Failing is final
    assert_eq!(handle.poll(), TextureState::Failed);
}

#[test]
fn undecodable_file_ends_failed() {
    let rt = runtime();
    let root = temp_dir("corrupt");
    std::fs::create_dir_all(root.path().join("textures")).unwrap();
    std::fs::write(root.path().join("textures/broken.png"), b"not a png").unwrap();
    let mut provider = TextureProvider::new(root.path().to_string_lossy(), rt.handle().clone());

    let handle = provider.load("textures/broken.png");
    assert_eq!(wait_for(&handle), TextureState::Failed);
}

#[test]
fn image_on_disk_ends_loaded() {
    let rt = runtime();
    let root = temp_dir("png");
    std::fs::create_dir_all(root.path().join("textures")).unwrap();
    let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([200, 10, 10, 255]));
    img.save(root.path().join("textures/red.png")).unwrap();
    let mut provider = TextureProvider::new(root.path().to_string_lossy(), rt.handle().clone());

    let handle = provider.load("textures/red.png");
    assert_eq!(wait_for(&handle), TextureState::Loaded);
    assert_eq!(handle.state(), TextureState::Loaded);
    let loaded = handle.image().unwrap();
    assert_eq!(loaded.dimensions(), (4, 2));
    assert_eq!(loaded.get_pixel(3, 1), &image::Rgba([200, 10, 10, 255]));
}

#[test]
fn texture_set_requests_each_texture_once() {
    let rt = runtime();
    let (_assets, mut provider) = provider_without_assets(&rt);
    let set = TextureSet::load(&mut provider);

    assert_eq!(provider.handles().count(), TextureSet::PATHS.len());
    assert_eq!(set.stone_wall.path(), "textures/stone_wall.jpg");
    assert_eq!(set.bunkbed_pole.path(), "textures/bunkbed_pole_texture.jpg");

    let again = TextureSet::load(&mut provider);
    assert!(again.window.ptr_eq(&set.window));
    assert_eq!(provider.handles().count(), TextureSet::PATHS.len());
}

#[test]
fn handles_start_pending() {
    let rt = runtime();
    let (_assets, mut provider) = provider_without_assets(&rt);
    let handle = provider.load("textures/toilet_texture.jpg");
    // Nothing has been polled yet
    assert_eq!(handle.state(), TextureState::Pending);
}

#[test]
fn several_images_decode_on_a_single_worker() {
    let rt = runtime();
    let root = temp_dir("several");
    std::fs::create_dir_all(root.path().join("textures")).unwrap();
    let paths: Vec<String> = (0..8).map(|i| format!("textures/tile_{i}.png")).collect();
    for (i, path) in paths.iter().enumerate() {
        image::RgbaImage::from_pixel(64, 64, image::Rgba([i as u8 * 30, 0, 0, 255]))
            .save(root.path().join(path))
            .unwrap();
    }
    let mut provider = TextureProvider::new(root.path().to_string_lossy(), rt.handle().clone());

    let handles: Vec<_> = paths.iter().map(|p| provider.load(p)).collect();
    for (i, handle) in handles.iter().enumerate() {
        assert_eq!(wait_for(handle), TextureState::Loaded, "{}", handle.path());
        assert_eq!(handle.image().unwrap().get_pixel(0, 0).0[0], i as u8 * 30);
    }
}

#[test]
fn asset_roots_are_private_and_removed_on_drop() {
    let rt = runtime();
    let (first, _) = provider_without_assets(&rt);
    let (second, _) = provider_without_assets(&rt);
    assert_ne!(first.path(), second.path());

    let path = first.path().to_path_buf();
    assert!(path.is_dir());
    drop(first);
    assert!(!path.exists());
}
