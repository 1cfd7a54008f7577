use macroquad::prelude::*;
use macroquad_isoline::{
    load_level_file, CameraCommand, Direction, IsoRenderer, MeshBatch, RenderConfig, TileRegistry,
};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "demos/isoline.toml";
const DEFAULT_MAP: &str = "demos/maps/meadow.mdmap";

fn window_conf() -> Conf {
    Conf {
        window_title: "Isoline Viewer".into(),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RenderConfig::load(CONFIG_PATH).unwrap_or_else(|err| {
        tracing::warn!(%err, "using default render config");
        RenderConfig::default()
    });
    let map_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_MAP.to_owned());

    let registry = TileRegistry::builtin();
    let level = match load_level_file(&map_path, &registry) {
        Ok(level) => level,
        Err(err) => {
            tracing::error!("{err:#}");
            return;
        }
    };
    let batch = match MeshBatch::new() {
        Ok(batch) => batch,
        Err(err) => {
            tracing::error!(%err, "line shader unavailable");
            return;
        }
    };
    let mut renderer =
        IsoRenderer::new(config, registry, batch, vec2(screen_width(), screen_height()));
    renderer.load_level(level);

    let mut screen = vec2(screen_width(), screen_height());
    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        for (key, dir) in [
            (KeyCode::Up, Direction::North),
            (KeyCode::Down, Direction::South),
            (KeyCode::Left, Direction::West),
            (KeyCode::Right, Direction::East),
        ] {
            if is_key_down(key) {
                renderer.queue(CameraCommand::Pan(dir));
            }
        }
        if is_key_pressed(KeyCode::Space) {
            renderer.queue(CameraCommand::Reset);
        }
        if is_key_pressed(KeyCode::A) {
            renderer.set_animation_enabled(!renderer.animation_enabled());
        }
        if is_key_pressed(KeyCode::Equal) || is_key_pressed(KeyCode::KpAdd) {
            renderer.set_animation_speed(renderer.animation_speed() * 0.8);
        }
        if is_key_pressed(KeyCode::Minus) || is_key_pressed(KeyCode::KpSubtract) {
            renderer.set_animation_speed(renderer.animation_speed() * 1.25);
        }

        let size = vec2(screen_width(), screen_height());
        if size != screen {
            screen = size;
            renderer.resize(size.x, size.y);
        }
        renderer.advance_time(get_frame_time());

        clear_background(Color::from_rgba(12, 14, 22, 255));
        if let Err(err) = renderer.render_frame() {
            tracing::error!(%err, "frame skipped");
        }

        let report = renderer.last_report();
        draw_text(
            &format!(
                "FPS: {}  tiles: {}  anim: {:.2}s{}",
                get_fps(),
                report.realized,
                renderer.animation_speed(),
                if renderer.animation_enabled() { "" } else { " (paused)" },
            ),
            20.0,
            30.0,
            24.0,
            WHITE,
        );

        next_frame().await;
    }

    if let Err(err) = renderer.unload_level() {
        tracing::warn!(%err, "level did not unload cleanly");
    }
}
