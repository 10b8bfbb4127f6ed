use std::cell::RefCell;
use std::rc::Rc;

use animtex_core::interp::rgba;
use animtex_core::pixel::color;
use animtex_core::{
    AnimatedTextureReader, AnimationComponent, AnimationFrameManager, Config, FrameData, Point,
    ReadFrame, SpriteFinder, SubRegion, TextureBuilder, TextureComponent, TextureEvent,
    TextureFinisher, TextureFrame, TextureFrameInterpolator, TextureListener, TextureLocation,
    TextureReloadListener, TextureResource, TextureState, VisibleAreaBuilder,
};
use animtex_core::{LazyTextureManager, PixelBuffer};
use animtex_test_fixtures::{
    png_from_pixels, png_strip, MockAtlas, MockPixelBuffer, MockRegistry, MockSprite, UploadCall,
};

/// Captures the texture's image as it stood during the last upload.
struct Capture<I>(Rc<RefCell<Option<I>>>);

impl<I: Clone + 'static> TextureComponent<I> for Capture<I> {
    fn into_listeners(self) -> Vec<TextureListener<I>> {
        let slot = self.0;
        vec![TextureListener::new(
            TextureEvent::Upload,
            move |state: &mut TextureState<I>| {
                *slot.borrow_mut() = Some(state.image().clone());
            },
        )]
    }
}

fn no_atlas_finder() -> SpriteFinder<MockAtlas, impl Fn(&TextureLocation) -> MockAtlas> {
    SpriteFinder::new(Vec::new(), |_: &TextureLocation| MockAtlas::default())
}

fn solid_frame(
    factory: &(impl Fn(u32, u32) -> MockPixelBuffer + Clone),
    size: u32,
    fill: u32,
    time: u32,
) -> ReadFrame<MockPixelBuffer> {
    let buffer = factory(size, size);
    let mut area = VisibleAreaBuilder::default();
    for y in 0..size {
        for x in 0..size {
            buffer.set_pixel(x, y, fill);
            area.add_pixel(Point::new(x as i32, y as i32));
        }
    }

    let data = FrameData {
        width: size,
        height: size,
        x_offset: 0,
        y_offset: 0,
        time: Some(time),
    };
    Rc::new(TextureFrame::new(
        data,
        vec![SubRegion::whole(Rc::new(buffer), area.build())],
    ))
}

/// it should upload a plain texture once at the origin and then stay quiet
#[test]
fn static_texture_uploads_once_at_origin() {
    let (factory, uploads) = MockPixelBuffer::factory();
    let reader = AnimatedTextureReader::new(Config::default(), factory);
    let builder = reader
        .read(&png_strip(8, &[[10, 20, 30, 255]]).unwrap(), "{}")
        .unwrap();

    let mut finisher = TextureFinisher::new(no_atlas_finder());
    finisher.queue(TextureLocation::new("textures/gui/title.png"), builder);
    let mut finished = finisher.finish();
    assert_eq!(finished.len(), 1);
    let (_, texture) = &mut finished[0];

    texture.bind();
    // An 8x8 frame carries levels 0..=3; each uploads at the shifted origin.
    let calls = uploads.borrow().clone();
    assert_eq!(calls.len(), 4);
    assert_eq!(
        calls[0],
        UploadCall {
            x: 0,
            y: 0,
            skip_x: 0,
            skip_y: 0,
            width: 8,
            height: 8
        }
    );

    texture.bind();
    assert_eq!(uploads.borrow().len(), 4);
}

/// it should bind the sprite's atlas and upload into its sub-rectangle
#[test]
fn sprite_texture_uploads_at_the_sprite_point() {
    let (factory, uploads) = MockPixelBuffer::factory();
    let reader = AnimatedTextureReader::new(Config::default(), factory);
    let builder = reader
        .read(&png_strip(8, &[[10, 20, 30, 255]]).unwrap(), "{}")
        .unwrap();

    let sprite = MockSprite::new("bat", Point::new(16, 32));
    let atlas = MockAtlas::with_sprites(vec![sprite.clone()]);
    let finder = SpriteFinder::new(vec![TextureLocation::new("atlas/blocks.png")], move |_| {
        atlas.clone()
    });

    let mut finisher = TextureFinisher::new(finder);
    finisher.queue(TextureLocation::new("textures/bat.png"), builder);
    let mut finished = finisher.finish();
    let (_, texture) = &mut finished[0];

    texture.bind();
    assert_eq!(sprite.bind_count(), 1);
    let calls = uploads.borrow().clone();
    assert_eq!(calls[0].x, 16);
    assert_eq!(calls[0].y, 32);
    assert_eq!(calls[1].x, 8);
    assert_eq!(calls[1].y, 16);
}

/// it should show the fifth frame after 43 ticks of a ten-frame animation
#[test]
fn animation_shows_the_frame_the_timeline_dictates() {
    let colors: Vec<[u8; 4]> = (0u8..10).map(|i| [i * 20, 0, 0, 255]).collect();
    let (factory, _) = MockPixelBuffer::factory();
    let reader = AnimatedTextureReader::new(Config::default(), factory);
    let builder = reader
        .read(
            &png_strip(8, &colors).unwrap(),
            r#"{ "animation": { "frametime": 10 } }"#,
        )
        .unwrap();

    let captured = Rc::new(RefCell::new(None));
    let builder = builder.add(Capture(Rc::clone(&captured)));

    let mut finisher = TextureFinisher::new(no_atlas_finder());
    finisher.queue(TextureLocation::new("textures/block/lava.png"), builder);
    let mut finished = finisher.finish();
    let (_, texture) = &mut finished[0];

    for _ in 0..43 {
        texture.tick();
    }
    texture.bind();

    let frame = captured.borrow().clone().unwrap();
    // Ticks 40..=49 belong to the fifth tile (index 4).
    assert_eq!(frame.level(0).pixel(0, 0), color(255, 80, 0, 0));
}

/// it should blend only the pixel that differs between frames
#[test]
fn interpolation_is_restricted_to_changing_pixels() {
    let base = [100u8, 100, 100, 255];
    let changed = [200u8, 100, 100, 255];
    // Second 4x4 tile differs from the first only at (2, 3).
    let mut pixels = vec![base; 32];
    pixels[16 + 3 * 4 + 2] = changed;

    let (factory, _) = MockPixelBuffer::factory();
    let reader = AnimatedTextureReader::new(Config::default(), factory);
    let builder = reader
        .read(
            &png_from_pixels(4, 8, &pixels).unwrap(),
            r#"{ "animation": { "frametime": 10, "interpolate": true } }"#,
        )
        .unwrap();

    let captured = Rc::new(RefCell::new(None));
    let builder = builder.add(Capture(Rc::clone(&captured)));

    let mut finisher = TextureFinisher::new(no_atlas_finder());
    finisher.queue(TextureLocation::new("textures/block/fire.png"), builder);
    let mut finished = finisher.finish();
    let (_, texture) = &mut finished[0];

    for _ in 0..5 {
        texture.tick();
    }
    texture.bind();

    let frame = captured.borrow().clone().unwrap();
    let level0 = frame.level(0);
    let packed_base = color(255, 100, 100, 100);
    let packed_changed = color(255, 200, 100, 100);
    assert_eq!(
        level0.pixel(2, 3),
        rgba::blend_color(10, 5, packed_base, packed_changed)
    );
    for y in 0..4 {
        for x in 0..4 {
            if (x, y) != (2, 3) {
                assert_eq!(level0.pixel(x, y), packed_base, "pixel ({x}, {y})");
            }
        }
    }
}

/// it should leave pixels untouched when every frame is identical
#[test]
fn identical_frames_have_no_changing_pixels() {
    let base = [100u8, 100, 100, 255];
    let (factory, _) = MockPixelBuffer::factory();
    let reader = AnimatedTextureReader::new(Config::default(), factory);
    let builder = reader
        .read(
            &png_from_pixels(4, 8, &vec![base; 32]).unwrap(),
            r#"{ "animation": { "frametime": 10, "interpolate": true } }"#,
        )
        .unwrap();

    let captured = Rc::new(RefCell::new(None));
    let builder = builder.add(Capture(Rc::clone(&captured)));

    let mut finisher = TextureFinisher::new(no_atlas_finder());
    finisher.queue(TextureLocation::new("textures/block/stone.png"), builder);
    let mut finished = finisher.finish();
    let (_, texture) = &mut finished[0];

    for _ in 0..5 {
        texture.tick();
    }
    texture.bind();

    let frame = captured.borrow().clone().unwrap();
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(frame.level(0).pixel(x, y), color(255, 100, 100, 100));
        }
    }
}

/// it should land inside the fifth frame when synchronized time is 375 of 800
#[test]
fn synchronized_interpolation_matches_the_shared_clock_phase() {
    let (factory, _) = MockPixelBuffer::factory();

    let fills: Vec<u32> = (0u8..10).map(|i| color(255, i * 20, 0, 0)).collect();
    let frames: Vec<ReadFrame<MockPixelBuffer>> = fills
        .iter()
        .map(|fill| solid_frame(&factory, 4, *fill, 80))
        .collect();

    let interpolator = TextureFrameInterpolator::new(factory.clone());
    let manager = AnimationFrameManager::with_interpolator(
        frames,
        |frame| frame.time().unwrap_or(1),
        Box::new(interpolator),
    )
    .unwrap();
    let manager = Rc::new(RefCell::new(manager));

    let captured = Rc::new(RefCell::new(None));
    let component = AnimationComponent::synchronized(manager, 800, || Some(375)).unwrap();
    let mut texture = TextureBuilder::new()
        .add(component)
        .add(Capture(Rc::clone(&captured)))
        .set_image(solid_frame(&factory, 4, fills[0], 80))
        .build();

    texture.tick();
    texture.bind();

    // 375 of 800 is 55 ticks into frame index 4 (boundaries every 80).
    let frame = captured.borrow().clone().unwrap();
    assert_eq!(
        frame.level(0).pixel(1, 1),
        rgba::blend_color(80, 55, fills[4], fills[5])
    );
}

/// it should normalize negative synchronized time like a direct modulo
#[test]
fn negative_time_equals_direct_modulo_for_any_magnitude() {
    let period: i64 = 800;
    for time in [-2399, -1601, -800, -375, -1, 0, 1, 799, 800, 2399i64] {
        // Repeated-increment normalization, as a reference.
        let mut reference = time;
        while reference < 0 {
            reference += period;
        }
        reference %= period;

        assert_eq!(time.rem_euclid(period), reference, "time {time}");
    }

    // The same normalization drives frame selection through the component.
    for time in [-374i64, 426] {
        let seen = Rc::new(RefCell::new(None));
        let manager = AnimationFrameManager::new((1u32..=10).collect(), |f| f * 10).unwrap();
        let component = AnimationComponent::synchronized(
            Rc::new(RefCell::new(manager)),
            period as u32,
            move || Some(time),
        )
        .unwrap();

        let mut texture = TextureBuilder::new()
            .add(component)
            .add(Capture(Rc::clone(&seen)))
            .set_image(0u32)
            .build();
        texture.tick();
        texture.bind();

        assert_eq!(seen.borrow().unwrap(), 9, "time {time}");
    }
}

/// it should leave the registry holding exactly the latest reload's locations
#[test]
fn reload_unregisters_dropped_locations() {
    let (factory, _) = MockPixelBuffer::factory();
    let reader = AnimatedTextureReader::new(Config::default(), factory);
    let mut listener = TextureReloadListener::new(reader);

    let registry = Rc::new(RefCell::new(MockRegistry::new()));
    let finisher = TextureFinisher::new(no_atlas_finder());
    let mut manager = LazyTextureManager::new(Rc::clone(&registry), finisher);

    let resource = |name: &str| TextureResource {
        location: TextureLocation::new(name),
        texture_bytes: png_strip(8, &[[1, 2, 3, 255]]).unwrap(),
        metadata_json: "{}".to_owned(),
    };

    listener.reload(&mut manager, vec![resource("a"), resource("b"), resource("c")]);
    assert_eq!(registry.borrow().locations(), ["a", "b", "c"]);

    listener.reload(&mut manager, vec![resource("a"), resource("d")]);
    assert_eq!(registry.borrow().locations(), ["a", "d"]);
}

/// it should skip a malformed texture without losing the rest of the batch
#[test]
fn reload_skips_malformed_textures() {
    let (factory, _) = MockPixelBuffer::factory();
    let reader = AnimatedTextureReader::new(Config::default(), factory);
    let mut listener = TextureReloadListener::new(reader);

    let registry = Rc::new(RefCell::new(MockRegistry::new()));
    let finisher = TextureFinisher::new(no_atlas_finder());
    let mut manager = LazyTextureManager::new(Rc::clone(&registry), finisher);

    let good = TextureResource {
        location: TextureLocation::new("good"),
        texture_bytes: png_strip(8, &[[1, 2, 3, 255]]).unwrap(),
        metadata_json: "{}".to_owned(),
    };
    let bad_image = TextureResource {
        location: TextureLocation::new("bad_image"),
        texture_bytes: b"not a png".to_vec(),
        metadata_json: "{}".to_owned(),
    };
    let bad_metadata = TextureResource {
        location: TextureLocation::new("bad_metadata"),
        texture_bytes: png_strip(8, &[[1, 2, 3, 255]]).unwrap(),
        metadata_json: r#"{ "animation": { "frametime": 0 } }"#.to_owned(),
    };
    // Each frame time fits in u32 on its own; the total duration does not.
    let overflowing_duration = TextureResource {
        location: TextureLocation::new("overflowing_duration"),
        texture_bytes: png_strip(8, &[[1, 2, 3, 255], [4, 5, 6, 255]]).unwrap(),
        metadata_json: r#"{ "animation": { "frametime": 2147483648 } }"#.to_owned(),
    };

    listener.reload(
        &mut manager,
        vec![bad_image, good, bad_metadata, overflowing_duration],
    );
    assert_eq!(registry.borrow().locations(), ["good"]);
}

/// it should tick every animated texture registered through the manager
#[test]
fn manager_ticks_registered_animations() {
    let (factory, uploads) = MockPixelBuffer::factory();
    let reader = AnimatedTextureReader::new(Config::default(), factory);
    let mut listener = TextureReloadListener::new(reader);

    let registry = Rc::new(RefCell::new(MockRegistry::new()));
    let finisher = TextureFinisher::new(no_atlas_finder());
    let mut manager = LazyTextureManager::new(Rc::clone(&registry), finisher);

    listener.reload(
        &mut manager,
        vec![TextureResource {
            location: TextureLocation::new("textures/block/water.png"),
            texture_bytes: png_strip(4, &[[255, 0, 0, 255], [0, 255, 0, 255]]).unwrap(),
            metadata_json: r#"{ "animation": { "frametime": 1 } }"#.to_owned(),
        }],
    );

    let texture = Rc::clone(&registry.borrow().textures[0].1);
    texture.borrow_mut().bind();
    let after_first_bind = uploads.borrow().len();
    assert!(after_first_bind > 0);

    // The frame flips every tick, so each tick-and-bind uploads again.
    manager.tick();
    texture.borrow_mut().bind();
    assert!(uploads.borrow().len() > after_first_bind);
}
