#[cfg(feature = "integration-tests")]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn cell_renders_more_than_the_clear_colour() {
    use cell_ngin::{Config, context::Renderer};

    use crate::common::test_utils::{app_context, runtime};

    const SIZE: u32 = 256;

    let rt = runtime();
    let mut app = app_context(&rt);
    app.resize(SIZE, SIZE);
    let config = Config::default();

    let image = rt.block_on(async {
        let mut renderer =
            Renderer::headless([SIZE, SIZE], config.clear_colour, &app.camera, &app.projection)
                .await
                .unwrap();
        renderer
            .render_to_image(&app.scene, &app.camera, &app.projection, SIZE, SIZE)
            .await
            .unwrap()
    });

    assert_eq!(image.dimensions(), (SIZE, SIZE));
    let lit = image.pixels().filter(|p| p.0[..3] != [0, 0, 0]).count();
    // The back wall fills most of the view
    assert!(lit > (SIZE * SIZE / 2) as usize, "only {lit} lit pixels");
}

#[test]
#[cfg(feature = "integration-tests")]
fn loaded_textures_replace_the_placeholder() {
    use cell_ngin::{
        Config, SceneAssembler,
        context::Renderer,
        flow::AppContext,
        resources::texture::{TextureProvider, TextureState},
    };

    use crate::common::test_utils::{runtime, temp_dir, wait_for};

    let rt = runtime();
    let root = temp_dir("gpu-textures");
    std::fs::create_dir_all(root.path().join("textures")).unwrap();
    image::RgbImage::from_pixel(2, 2, image::Rgb([90, 90, 90]))
        .save(root.path().join("textures/stone_wall.jpg"))
        .unwrap();
    let provider = TextureProvider::new(root.path().to_string_lossy(), rt.handle().clone());
    let config = Config::default();
    let app = AppContext::with_assembler(&config, provider, &SceneAssembler::cell(), 128, 128).unwrap();
    assert_eq!(wait_for(&app.texture_set.stone_wall), TextureState::Loaded);

    rt.block_on(async {
        let mut renderer =
            Renderer::headless([128, 128], config.clear_colour, &app.camera, &app.projection)
                .await
                .unwrap();
        assert_eq!(renderer.textured_materials(), 0);
        renderer
            .render_to_image(&app.scene, &app.camera, &app.projection, 128, 128)
            .await
            .unwrap();
        assert_eq!(renderer.textured_materials(), 1);
    });
}
