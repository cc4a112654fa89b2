use engine::{Canvas, InputSnapshot, Scene, Viewport};
use tracing::{error, info, warn};

use super::config::ExplorerConfig;
use super::explore::{RenderTarget, SimContext, TravelState};
use super::presenter::CanvasPresenter;
use super::world_map::{WorldMap, WorldMapError};

/// The single explorer screen. Owns the simulation once the map has loaded
/// and a presenter that outlives a failed load so the error stays visible.
pub(crate) struct ExplorerScene {
    config: ExplorerConfig,
    pending_map: Option<Result<WorldMap, WorldMapError>>,
    presenter: CanvasPresenter,
    sim: Option<SimContext>,
}

impl ExplorerScene {
    pub(crate) fn new(config: ExplorerConfig, map: Result<WorldMap, WorldMapError>) -> Self {
        let presenter = match &map {
            Ok(map) => CanvasPresenter::new(&config, map),
            Err(_) => CanvasPresenter::new(&config, &WorldMap::default()),
        };
        Self {
            config,
            pending_map: Some(map),
            presenter,
            sim: None,
        }
    }

    fn initial_viewport(&self) -> Viewport {
        Viewport {
            width: self.config.window_width,
            height: self.config.window_height,
        }
    }

    #[cfg(test)]
    pub(crate) fn sim(&self) -> Option<&SimContext> {
        self.sim.as_ref()
    }
}

impl Scene for ExplorerScene {
    fn load(&mut self) {
        match self.pending_map.take() {
            Some(Ok(map)) => {
                let point_count = map.len();
                if map.is_empty() {
                    warn!("world_map_empty");
                }
                self.sim = Some(SimContext::new(&self.config, map, self.initial_viewport()));
                info!(point_count, "scene_loaded");
            }
            Some(Err(err)) => {
                error!(error = %err, "world_map_unavailable");
                self.presenter.show_error(&err.to_string());
            }
            None => {}
        }
    }

    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) {
        let Some(sim) = self.sim.as_mut() else {
            return;
        };

        let mut input = *input;
        if input.left_click_pressed() {
            if let Some(slot) = input
                .cursor_position_px()
                .and_then(|cursor| self.presenter.nav_slot_at(cursor))
            {
                sim.travel_to_point(slot);
                input = input.with_left_click_pressed(false);
            }
        }

        sim.tick(fixed_dt_seconds, &input, &mut self.presenter);
    }

    fn render(&mut self, canvas: &mut Canvas) {
        self.presenter.compose(canvas);
    }

    fn unload(&mut self) {
        self.sim = None;
        info!("scene_unloaded");
    }

    fn window_title(&self) -> Option<String> {
        if self.presenter.has_error() {
            return Some(format!("{} - map unavailable", self.config.window_title));
        }
        let sim = self.sim.as_ref()?;
        if sim.travel_state() != TravelState::Idle {
            return Some(format!("{} - traveling", self.config.window_title));
        }
        let point = sim.nearby().and_then(|index| sim.map().get(index))?;
        Some(format!("{} - {}", self.config.window_title, point.poi.title))
    }
}
