use engine::{InputAction, InputSnapshot, Vec2, Viewport};

use super::avatar::MovementMode;
use super::*;
use crate::app::world_map::{parse_points_json, PointOfInterest};

const VIEWPORT: Viewport = Viewport {
    width: 1280,
    height: 720,
};
const DT: f32 = 1.0 / 60.0;

const POINTS: &str = include_str!("../../../../../assets/points.json");

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Clear,
    Roads,
    TrailSegment,
    ShowPrompt(String),
    HidePrompt,
    OpenDetail(String),
    CloseDetail,
    Ambient(usize),
    Error(String),
}

#[derive(Debug, Default)]
struct RecordingTarget {
    events: Vec<Event>,
    avatar: Option<(Vec2, Facing, bool)>,
    camera: Option<Vec2>,
}

impl RecordingTarget {
    fn prompt_events(&self) -> Vec<Event> {
        self.events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    Event::ShowPrompt(_)
                        | Event::HidePrompt
                        | Event::OpenDetail(_)
                        | Event::CloseDetail
                )
            })
            .cloned()
            .collect()
    }
}

impl RenderTarget for RecordingTarget {
    fn set_avatar_transform(&mut self, position: Vec2, facing: Facing, moving: bool) {
        self.avatar = Some((position, facing, moving));
    }

    fn set_camera_transform(&mut self, offset: Vec2) {
        self.camera = Some(offset);
    }

    fn clear_surface(&mut self) {
        self.events.push(Event::Clear);
    }

    fn draw_roads(&mut self) {
        self.events.push(Event::Roads);
    }

    fn draw_trail_segment(&mut self, _segment: &TrailSegment) {
        self.events.push(Event::TrailSegment);
    }

    fn show_prompt(&mut self, title: &str) {
        self.events.push(Event::ShowPrompt(title.to_string()));
    }

    fn hide_prompt(&mut self) {
        self.events.push(Event::HidePrompt);
    }

    fn open_detail(&mut self, point: &PointOfInterest) {
        self.events.push(Event::OpenDetail(point.id.clone()));
    }

    fn close_detail(&mut self) {
        self.events.push(Event::CloseDetail);
    }

    fn draw_ambient(&mut self, particles: &[Particle]) {
        self.events.push(Event::Ambient(particles.len()));
    }

    fn show_error(&mut self, message: &str) {
        self.events.push(Event::Error(message.to_string()));
    }
}

fn default_map(config: &ExplorerConfig) -> WorldMap {
    let points = parse_points_json(POINTS).expect("bundled points");
    WorldMap::from_points(points, config).expect("map")
}

fn sim_at(position: Vec2) -> SimContext {
    let config = ExplorerConfig {
        avatar_spawn: crate::app::config::ConfigVec2 {
            x: position.x,
            y: position.y,
        },
        ..ExplorerConfig::default()
    };
    let map = default_map(&config);
    SimContext::new(&config, map, VIEWPORT)
}

fn holding(action: InputAction) -> InputSnapshot {
    InputSnapshot::empty().with_action_down(action, true)
}

fn pressing(action: InputAction) -> InputSnapshot {
    InputSnapshot::empty().with_action_pressed(action, true)
}

fn nav(slot: u8) -> InputSnapshot {
    InputSnapshot::empty().with_nav_slot_pressed(Some(slot))
}

fn run(sim: &mut SimContext, target: &mut RecordingTarget, input: InputSnapshot, ticks: usize) {
    for _ in 0..ticks {
        sim.tick(DT, &input, target);
    }
}

fn index_of(sim: &SimContext, id: &str) -> usize {
    sim.map()
        .points()
        .iter()
        .position(|point| point.poi.id == id)
        .expect("point id")
}

#[test]
fn down_key_at_top_end_of_vertical_road_moves_one_step() {
    let mut sim = sim_at(Vec2::new(2500.0, 1700.0));
    let mut target = RecordingTarget::default();

    sim.tick(DT, &holding(InputAction::MoveDown), &mut target);

    assert_eq!(sim.avatar().position, Vec2::new(2500.0, 1704.0));
    assert_eq!(sim.avatar().facing, Facing::Left);
    assert!(sim.avatar().moving);
    assert_eq!(sim.avatar().mode, MovementMode::Keyboard);
}

#[test]
fn right_key_at_top_end_of_vertical_road_moves_along_x() {
    let mut sim = sim_at(Vec2::new(2500.0, 1700.0));
    let mut target = RecordingTarget::default();

    sim.tick(DT, &holding(InputAction::MoveRight), &mut target);

    assert_eq!(sim.avatar().position, Vec2::new(2504.0, 1700.0));
    assert_eq!(sim.avatar().facing, Facing::Right);
    let (position, facing, moving) = target.avatar.expect("avatar transform");
    assert_eq!(position, Vec2::new(2504.0, 1700.0));
    assert_eq!(facing, Facing::Right);
    assert!(moving);
}

#[test]
fn tick_redraws_roads_before_trail_and_ambient() {
    let mut sim = sim_at(Vec2::new(2500.0, 2500.0));
    let mut target = RecordingTarget::default();

    run(&mut sim, &mut target, holding(InputAction::MoveUp), 3);

    let last_tick: Vec<Event> = target
        .events
        .iter()
        .rev()
        .take_while(|event| **event != Event::Clear)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    assert_eq!(
        last_tick,
        vec![
            Event::Roads,
            Event::TrailSegment,
            Event::TrailSegment,
            Event::Ambient(100),
        ]
    );
}

#[test]
fn trail_grows_only_while_a_direction_is_held() {
    let mut sim = sim_at(Vec2::new(2500.0, 2500.0));
    let mut target = RecordingTarget::default();

    run(&mut sim, &mut target, InputSnapshot::empty(), 5);
    assert!(!target.events.contains(&Event::TrailSegment));

    // A direction held against a road edge still records trail points.
    let mut blocked = sim_at(Vec2::new(1700.0, 2200.0));
    let mut blocked_target = RecordingTarget::default();
    run(&mut blocked, &mut blocked_target, holding(InputAction::MoveLeft), 3);
    assert!(!blocked.avatar().moving);
    assert!(blocked_target.events.contains(&Event::TrailSegment));
}

#[test]
fn approaching_and_leaving_a_point_shows_then_hides_prompt() {
    let mut sim = sim_at(Vec2::new(2500.0, 2100.0));
    let mut target = RecordingTarget::default();
    let music = index_of(&sim, "p5");

    run(&mut sim, &mut target, holding(InputAction::MoveUp), 20);
    assert_eq!(sim.nearby(), Some(music));

    run(&mut sim, &mut target, holding(InputAction::MoveDown), 40);
    assert_eq!(sim.nearby(), None);

    let title = sim.map().points()[music].poi.title.clone();
    assert_eq!(
        target.prompt_events(),
        vec![Event::ShowPrompt(title), Event::HidePrompt]
    );
}

#[test]
fn interact_opens_detail_and_escape_closes_it() {
    let mut sim = sim_at(Vec2::new(2465.0, 1965.0));
    let mut target = RecordingTarget::default();

    sim.tick(DT, &InputSnapshot::empty(), &mut target);
    sim.tick(DT, &pressing(InputAction::Interact), &mut target);
    sim.tick(DT, &pressing(InputAction::CloseDetail), &mut target);
    sim.tick(DT, &pressing(InputAction::CloseDetail), &mut target);

    let events = target.prompt_events();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], Event::ShowPrompt(_)));
    assert_eq!(events[1], Event::OpenDetail("p5".to_string()));
    assert_eq!(events[2], Event::CloseDetail);
}

#[test]
fn interact_away_from_points_does_nothing() {
    let mut sim = sim_at(Vec2::new(2500.0, 2500.0));
    let mut target = RecordingTarget::default();

    sim.tick(DT, &pressing(InputAction::Interact), &mut target);
    assert!(target.prompt_events().is_empty());
}

#[test]
fn nav_slot_travels_along_roads_to_the_point() {
    let mut sim = sim_at(Vec2::new(2500.0, 2500.0));
    let mut target = RecordingTarget::default();
    let shop = index_of(&sim, "p1");

    sim.tick(DT, &nav(shop as u8), &mut target);
    assert_eq!(sim.avatar().mode, MovementMode::ScriptedTravel);
    assert_eq!(sim.travel_state(), TravelState::TravelingVertical);

    // Keys are ignored while travelling.
    run(&mut sim, &mut target, holding(InputAction::MoveRight), 10);
    assert_eq!(sim.avatar().position.x, 2500.0);

    run(&mut sim, &mut target, InputSnapshot::empty(), 200);
    assert_eq!(sim.avatar().mode, MovementMode::Keyboard);
    assert_eq!(
        sim.avatar().position,
        sim.map().points()[shop].interaction_point
    );
    assert_eq!(sim.nearby(), Some(shop));
}

#[test]
fn new_travel_command_mid_flight_replans_from_current_position() {
    let mut sim = sim_at(Vec2::new(2500.0, 2500.0));
    let mut target = RecordingTarget::default();
    let shop = index_of(&sim, "p1");
    let game = index_of(&sim, "p3");

    sim.tick(DT, &nav(shop as u8), &mut target);
    run(&mut sim, &mut target, InputSnapshot::empty(), 30);
    let mid_flight = sim.avatar().position;
    assert!(mid_flight.y < 2500.0 && mid_flight.y > 2200.0);

    sim.tick(DT, &nav(game as u8), &mut target);
    assert_eq!(sim.travel_state(), TravelState::TravelingVertical);

    let mut previous_y = mid_flight.y;
    for _ in 0..200 {
        sim.tick(DT, &InputSnapshot::empty(), &mut target);
        let y = sim.avatar().position.y;
        assert!(y >= previous_y, "stale target pulled the avatar back up");
        previous_y = y;
    }
    assert_eq!(
        sim.avatar().position,
        sim.map().points()[game].interaction_point
    );
}

#[test]
fn travel_to_current_spot_never_enters_scripted_mode() {
    let music_road_spot = Vec2::new(2500.0, 2000.0);
    let mut sim = sim_at(music_road_spot);
    let mut target = RecordingTarget::default();
    let music = index_of(&sim, "p5");

    sim.tick(DT, &nav(music as u8), &mut target);

    assert_eq!(sim.avatar().mode, MovementMode::Keyboard);
    assert_eq!(sim.travel_state(), TravelState::Idle);
}

#[test]
fn click_sets_pointer_target_through_the_camera() {
    let mut sim = sim_at(Vec2::new(2500.0, 2500.0));
    let mut target = RecordingTarget::default();
    run(&mut sim, &mut target, InputSnapshot::empty(), 300);

    // 60 world units above the avatar, at 1.5 pixels per unit.
    let click = InputSnapshot::empty()
        .with_left_click_pressed(true)
        .with_cursor_position_px(Some(Vec2::new(640.0, 270.0)));
    sim.tick(DT, &click, &mut target);
    run(&mut sim, &mut target, InputSnapshot::empty(), 20);

    let position = sim.avatar().position;
    assert!((position.x - 2500.0).abs() < 0.5);
    assert!((position.y - 2440.0).abs() < 0.5);
    assert!(!sim.avatar().moving);
}

#[test]
fn tapping_a_direction_cancels_the_click_walk() {
    let mut sim = sim_at(Vec2::new(2500.0, 2500.0));
    let mut target = RecordingTarget::default();
    run(&mut sim, &mut target, InputSnapshot::empty(), 300);

    let click = InputSnapshot::empty()
        .with_left_click_pressed(true)
        .with_cursor_position_px(Some(Vec2::new(640.0, 270.0)));
    sim.tick(DT, &click, &mut target);
    let after_click = sim.avatar().position;
    assert!(sim.avatar().moving);

    // Pressed and released between two ticks: never seen as held.
    sim.tick(DT, &pressing(InputAction::MoveUp), &mut target);
    run(&mut sim, &mut target, InputSnapshot::empty(), 20);

    assert_eq!(sim.avatar().position, after_click);
    assert!(!sim.avatar().moving);
}

#[test]
fn empty_map_ticks_without_prompts() {
    let config = ExplorerConfig::default();
    let mut sim = SimContext::new(&config, WorldMap::default(), VIEWPORT);
    let mut target = RecordingTarget::default();

    sim.tick(DT, &nav(0), &mut target);
    sim.tick(DT, &pressing(InputAction::Interact), &mut target);
    run(&mut sim, &mut target, holding(InputAction::MoveUp), 10);

    assert!(target.prompt_events().is_empty());
    assert_eq!(sim.travel_state(), TravelState::Idle);
    assert!(!target.events.iter().any(|event| matches!(event, Event::Error(_))));
}

#[test]
fn camera_converges_on_the_avatar() {
    let mut sim = sim_at(Vec2::new(2500.0, 2200.0));
    let mut target = RecordingTarget::default();
    run(&mut sim, &mut target, InputSnapshot::empty(), 300);

    let expected = VIEWPORT.center() - Vec2::new(2500.0, 2200.0);
    let offset = sim.camera_offset();
    assert!((offset.x - expected.x).abs() < 0.1);
    assert!((offset.y - expected.y).abs() < 0.1);
    assert_eq!(target.camera, Some(offset));
}

#[test]
fn window_size_in_snapshot_recenters_camera() {
    let mut sim = sim_at(Vec2::new(2500.0, 2500.0));
    let mut target = RecordingTarget::default();
    let resized = InputSnapshot::empty().with_window_size((800, 600));
    run(&mut sim, &mut target, resized, 300);

    let offset = sim.camera_offset();
    assert!((offset.x - (400.0 - 2500.0)).abs() < 0.1);
    assert!((offset.y - (300.0 - 2500.0)).abs() < 0.1);
}
