// tests/render_tests.rs

use std::rc::Rc;

use macroquad::math::vec2;
use macroquad_isoline::{
    state_at, CameraCommand, DrawBatch, Direction, HeadlessBatch, IsoRenderer,
    Level, LevelHeader, LevelLayer, RenderConfig, RenderError, TileKind, TileRegistry, TileTypeId,
};

fn level_of(width: u32, height: u32, layers: Vec<Vec<Option<TileTypeId>>>) -> Level {
    let names: Vec<String> = (0..layers.len()).map(|i| format!("layer{i}")).collect();
    Level::new(
        LevelHeader {
            name: "render".into(),
            width,
            height,
            layers: names.clone(),
        },
        names
            .into_iter()
            .zip(layers)
            .map(|(name, cells)| LevelLayer::new(name, cells))
            .collect(),
    )
    .unwrap()
}

fn filled(width: u32, height: u32, kind: TileKind) -> Level {
    let id = TileRegistry::builtin().id_of(kind);
    level_of(width, height, vec![vec![id; (width * height) as usize]])
}

fn renderer(batch: HeadlessBatch) -> IsoRenderer<HeadlessBatch> {
    IsoRenderer::new(
        RenderConfig::default(),
        TileRegistry::builtin(),
        batch,
        vec2(800.0, 600.0),
    )
}

#[test]
fn frame_is_one_begin_submit_end() {
    let mut r = renderer(HeadlessBatch::new());
    r.load_level(filled(3, 3, TileKind::Grass));
    r.render_frame().unwrap();
    r.render_frame().unwrap();

    let stats = r.batch().stats();
    assert_eq!(stats.begins, 2);
    assert_eq!(stats.submits, 2);
    assert_eq!(stats.ends, 2);
    assert_eq!(r.batch().last_submit().len(), 9);
}

#[test]
fn no_level_draws_nothing() {
    let mut r = renderer(HeadlessBatch::new());
    r.set_offset(10.0, 10.0);
    r.render_frame().unwrap();
    assert_eq!(r.batch().stats().begins, 0);
    assert!(matches!(r.set_tile(0, 0, 0, None), Err(RenderError::NoLevel)));
}

#[test]
fn upper_layers_draw_after_lower_ones() {
    let reg = TileRegistry::builtin();
    let sand = reg.id_of(TileKind::Sand);
    let pyramid = reg.id_of(TileKind::Pyramid);
    let mut r = renderer(HeadlessBatch::new());
    r.load_level(level_of(
        2,
        2,
        vec![vec![sand; 4], vec![None, pyramid, pyramid, None]],
    ));
    r.render_frame().unwrap();

    let scene = r.scene().unwrap();
    let keys: Vec<_> = r
        .batch()
        .last_submit()
        .iter()
        .map(|id| {
            scene
                .instances()
                .find(|i| i.drawable() == *id)
                .map(|i| (i.key().layer, i.key().y, i.key().x))
                .unwrap()
        })
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(keys.len(), 6);
    assert_eq!(&keys[4..], &[(1, 0, 1), (1, 1, 0)]);
}

#[test]
fn resource_failure_skips_the_frame_and_recovers() {
    let mut r = renderer(HeadlessBatch::with_limit(5));
    r.load_level(filled(3, 3, TileKind::Sand));

    let err = r.render_frame().unwrap_err();
    assert!(matches!(err, RenderError::Resource(_)));
    assert_eq!(r.batch().stats().begins, 0);
    assert_eq!(r.batch().stats().submits, 0);

    r.batch_mut().set_limit(None);
    r.render_frame().unwrap();
    assert_eq!(r.batch().live(), 9);
    assert_eq!(r.scene().unwrap().len(), 9);
    assert_eq!(r.batch().last_submit().len(), 9);
}

#[test]
fn unknown_tile_type_is_reported() {
    let mut r = renderer(HeadlessBatch::new());
    r.load_level(level_of(1, 1, vec![vec![Some(TileTypeId(999))]]));
    let err = r.render_frame().unwrap_err();
    assert!(matches!(err, RenderError::UnknownTileType(TileTypeId(999))));
    assert_eq!(r.batch().stats().begins, 0);
}

#[test]
fn reload_drops_old_geometry() {
    let mut r = renderer(HeadlessBatch::new());
    r.load_level(filled(2, 2, TileKind::Forest));
    r.render_frame().unwrap();
    let old = Rc::clone(r.scene().unwrap().instance(0, 0, 0).unwrap().geometry());
    let generation = r.cache().generation();
    assert!(Rc::strong_count(&old) > 1);

    r.load_level(filled(2, 2, TileKind::Water));
    assert_eq!(Rc::strong_count(&old), 1);
    assert_eq!(r.batch().live(), 0);
    assert!(r.cache().is_empty());
    assert_ne!(r.cache().generation(), generation);

    r.render_frame().unwrap();
    let water = r.cache().registry().id_of(TileKind::Water).unwrap();
    for inst in r.scene().unwrap().instances() {
        assert_eq!(inst.type_id(), water);
        assert!(Rc::ptr_eq(
            r.batch().geometry(inst.drawable()).unwrap(),
            inst.geometry()
        ));
    }
}

#[test]
fn queued_commands_apply_at_render() {
    let mut r = renderer(HeadlessBatch::new());
    r.load_level(filled(4, 4, TileKind::Snow));
    r.render_frame().unwrap();
    let start = r.scene().unwrap().offset();

    r.queue(CameraCommand::Pan(Direction::West));
    r.queue(CameraCommand::Pan(Direction::North));
    assert_eq!(r.scene().unwrap().offset(), start);
    r.render_frame().unwrap();
    let step = r.config().pan_step;
    assert_eq!(r.scene().unwrap().offset(), start + vec2(step, step));

    r.queue(CameraCommand::Reset);
    r.render_frame().unwrap();
    assert_eq!(r.scene().unwrap().offset(), start);
}

#[test]
fn animation_follows_elapsed_time_only() {
    let deltas = [0.07, 0.13, 0.3, 0.01, 0.5, 0.25, 0.0, 0.9, 0.2, 0.2];
    let run = |render_every_step: bool| {
        let mut r = renderer(HeadlessBatch::new());
        r.load_level(filled(3, 3, TileKind::Lava));
        r.render_frame().unwrap();
        for d in deltas {
            r.advance_time(d);
            if render_every_step {
                r.render_frame().unwrap();
            }
        }
        r.render_frame().unwrap();
        let scene = r.scene().unwrap();
        let tick = scene.animation().tick();
        let states: Vec<_> = scene.instances().map(|i| (i.key(), i.state())).collect();
        (tick, states)
    };

    let (tick_a, a) = run(true);
    let (tick_b, b) = run(false);
    assert_eq!(tick_a, tick_b);
    assert_eq!(a, b);
    for (key, state) in a {
        assert_eq!(state, state_at(tick_a, key.position(), TileKind::Lava.state_count()));
    }
}

#[test]
fn paused_animation_keeps_states() {
    let mut r = renderer(HeadlessBatch::new());
    r.set_animation_enabled(false);
    r.load_level(filled(2, 2, TileKind::Water));
    r.render_frame().unwrap();
    r.batch_mut().reset_stats();

    r.advance_time(5.0);
    r.render_frame().unwrap();
    assert_eq!(r.scene().unwrap().animation().tick(), 0);
    assert_eq!(r.batch().stats().creates, 0);
    assert!(r.last_report().is_idle());

    r.set_animation_enabled(true);
    r.advance_time(r.animation_speed());
    r.render_frame().unwrap();
    assert_eq!(r.last_report().swapped, 4);
}

#[test]
fn edited_cells_swap_in_place() {
    let reg = TileRegistry::builtin();
    let mut r = renderer(HeadlessBatch::new());
    r.load_level(filled(3, 3, TileKind::Sand));
    r.render_frame().unwrap();

    r.set_tile(0, 1, 1, reg.id_of(TileKind::Pyramid)).unwrap();
    r.set_tile(0, 2, 2, None).unwrap();
    r.render_frame().unwrap();

    let report = r.last_report();
    assert_eq!(report.swapped, 1);
    assert_eq!(report.destroyed, 1);
    assert_eq!(report.moved, 0);
    let scene = r.scene().unwrap();
    assert_eq!(
        scene.instance(0, 1, 1).map(|i| i.type_id()),
        reg.id_of(TileKind::Pyramid)
    );
    assert!(scene.instance(0, 2, 2).is_none());
    assert_eq!(r.batch().live(), 8);
    assert!(matches!(
        r.set_tile(0, 3, 0, None),
        Err(RenderError::CellOutOfBounds { .. })
    ));
}

#[test]
fn immediate_camera_calls_follow_queued_ones() {
    let mut r = renderer(HeadlessBatch::new());
    r.load_level(filled(4, 4, TileKind::Snow));
    let centred = r.scene().unwrap().offset();
    let step = r.config().pan_step;

    r.queue(CameraCommand::Pan(Direction::North));
    r.apply(CameraCommand::Reset);
    r.render_frame().unwrap();
    assert_eq!(r.scene().unwrap().offset(), centred);

    r.queue(CameraCommand::Pan(Direction::West));
    r.set_offset(0.0, 10.0);
    r.render_frame().unwrap();
    assert_eq!(r.scene().unwrap().offset(), centred + vec2(step, 10.0));

    r.queue(CameraCommand::Pan(Direction::South));
    r.reset_offset();
    r.render_frame().unwrap();
    assert_eq!(r.scene().unwrap().offset(), centred);
}

#[test]
fn reload_cancels_pending_work() {
    let reg = TileRegistry::builtin();
    let mut r = renderer(HeadlessBatch::new());
    r.load_level(filled(3, 3, TileKind::Grass));
    r.render_frame().unwrap();

    r.queue(CameraCommand::Pan(Direction::East));
    r.set_tile(0, 1, 1, reg.id_of(TileKind::Pyramid)).unwrap();
    r.advance_time(1.0);
    r.load_level(filled(3, 3, TileKind::Water));
    r.batch_mut().reset_stats();
    r.render_frame().unwrap();

    let mut fresh = renderer(HeadlessBatch::new());
    fresh.load_level(filled(3, 3, TileKind::Water));

    let scene = r.scene().unwrap();
    assert_eq!(scene.offset(), fresh.scene().unwrap().offset());
    assert_eq!(scene.animation().tick(), 0);
    let water = reg.id_of(TileKind::Water).unwrap();
    assert_eq!(scene.len(), 9);
    assert!(scene.instances().all(|i| i.type_id() == water));
    assert_eq!(scene.instance(0, 1, 1).map(|i| i.type_id()), Some(water));

    let report = r.last_report();
    assert_eq!((report.created, report.destroyed), (9, 0));
    assert_eq!((report.moved, report.swapped), (0, 0));
    assert_eq!(r.batch().stats().destroys, 0);
}

#[test]
fn resize_recentres_the_map() {
    let mut r = renderer(HeadlessBatch::new());
    r.load_level(filled(4, 4, TileKind::Sand));
    r.set_offset(100.0, -40.0);
    r.render_frame().unwrap();

    r.resize(1024.0, 768.0);
    r.render_frame().unwrap();

    let mut fresh = IsoRenderer::new(
        RenderConfig::default(),
        TileRegistry::builtin(),
        HeadlessBatch::new(),
        vec2(1024.0, 768.0),
    );
    fresh.load_level(filled(4, 4, TileKind::Sand));
    let centred = fresh.scene().unwrap().offset();

    let scene = r.scene().unwrap();
    assert_eq!(scene.viewport(), vec2(1024.0, 768.0));
    assert_eq!(scene.offset(), centred);

    // an unchanged size leaves a panned camera alone
    r.set_offset(5.0, 0.0);
    r.resize(1024.0, 768.0);
    assert_eq!(r.scene().unwrap().offset(), centred + vec2(5.0, 0.0));
}
