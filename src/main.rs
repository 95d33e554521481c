use anyhow::Result;
use glam::{Quat, Vec2, Vec3};
use log::info;
use std::time::Duration;

use strider::engine::game_loop::FixedTimestep;
use strider::engine::physics::body::presets;
use strider::engine::physics::{BodyBuilder, PhysicsWorld, RapierCharacter, RigidBodyHandle, Vector};
use strider::game::movement::{
    CameraBasis, CharacterBody, Controller, ControllerConfig, Grounding, MoveInput, SurfaceTag,
};

/// Simulated seconds the demo runs for
const DEMO_SECONDS: f32 = 12.0;

/// Render frame length fed into the fixed timestep
const FRAME_TIME: Duration = Duration::from_micros(33_333);

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Strider movement demo...");

    let config = load_config()?;
    let mut controller = Controller::new(config)?;

    let mut world = PhysicsWorld::new();
    let character = build_level(&mut world);
    info!("Level built, character spawned");

    let mut timestep = FixedTimestep::new();
    world.set_timestep(timestep.dt());

    let mut elapsed = 0.0;
    let mut last_grounding = Grounding::Airborne;
    while elapsed < DEMO_SECONDS {
        for _ in 0..timestep.advance(FRAME_TIME) {
            let script = Script::at(elapsed);
            world.set_gravity_vec3(script.gravity);
            if script.jump {
                controller.jump();
            }

            for sample in world.character_contacts(character) {
                controller.on_contact(sample);
            }

            let gravity = world.gravity_vec3();
            let mut host = RapierCharacter::new(&mut world, character)
                .ok_or_else(|| anyhow::anyhow!("Character body disappeared"))?;
            let report = controller.tick(&mut host, &script.input, gravity, timestep.dt())?;
            let position = host.position();

            if report.grounding != last_grounding {
                info!(
                    "t={:5.2}s {:?} -> {:?} at {:?}",
                    elapsed, last_grounding, report.grounding, position
                );
                last_grounding = report.grounding;
            }
            if let Some(jump) = report.jump {
                info!(
                    "t={:5.2}s jump from {:?}, launch direction {:?}",
                    elapsed, jump.taken_from, jump.direction
                );
            }

            world.step();
            elapsed += timestep.dt();
        }
    }

    info!(
        "Demo finished after {} steps, final velocity {:?}",
        timestep.step_count(),
        controller.state().velocity
    );
    Ok(())
}

/// Controller configuration from the JSON file named by the first argument
fn load_config() -> Result<ControllerConfig> {
    let Some(path) = std::env::args().nth(1) else {
        info!("No config file given, using defaults");
        return Ok(ControllerConfig {
            movement_speed: 5.0,
            air_movement_speed: 2.0,
            max_air_jumps: 1,
            ..Default::default()
        });
    };

    let text = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
    let config = serde_json::from_str(&text)
        .map_err(|e| anyhow::anyhow!("Invalid controller config {}: {}", path, e))?;
    info!("Loaded controller config from {}", path);
    Ok(config)
}

/// Floor, a stairs ramp and a narrow valley between two steep walls
fn build_level(world: &mut PhysicsWorld) -> RigidBodyHandle {
    let floor = world.add_rigid_body(presets::terrain_body(0.0, -0.5, 0.0));
    world.add_collider(presets::terrain_collider(60.0, 1.0, 60.0), floor);

    // 40° ramp: too steep as ground, walkable as stairs
    let ramp = world.add_rigid_body(presets::tilted_terrain_body(
        0.0,
        1.0,
        12.0,
        -40f32.to_radians(),
    ));
    world.add_tagged_collider(
        presets::terrain_collider(4.0, 0.5, 8.0),
        ramp,
        SurfaceTag::Stairs,
    );

    for side in [-1.0, 1.0] {
        let wall = world.add_rigid_body(
            BodyBuilder::new_fixed()
                .position_rotation(
                    Vector::new(side * 1.2, 1.5, -8.0),
                    Vector::new(0.0, 0.0, side * 70f32.to_radians()),
                )
                .build(),
        );
        world.add_tagged_collider(
            presets::terrain_collider(0.5, 4.0, 6.0),
            wall,
            SurfaceTag::Other,
        );
    }

    let character = world.add_rigid_body(presets::character_body(0.0, 1.5, 0.0));
    world.add_collider(presets::character_collider(0.5, 2.0, 70.0), character);
    character
}

/// Scripted player input for one moment of the demo
struct Script {
    input: MoveInput,
    gravity: Vec3,
    jump: bool,
}

impl Script {
    fn at(t: f32) -> Self {
        let camera = CameraBasis::from_rotation(Quat::from_rotation_x(0.3));
        let standard = Vec3::new(0.0, -9.81, 0.0);
        let (intent, gravity) = match t {
            t if t < 1.0 => (Vec2::ZERO, standard),
            t if t < 5.0 => (Vec2::Y, standard),
            t if t < 8.0 => (Vec2::new(0.0, -1.0), standard),
            // Gravity swings toward +X while strafing
            t => {
                let angle = ((t - 8.0) / 4.0).min(1.0) * 0.5;
                let gravity = Quat::from_rotation_z(angle) * standard;
                (Vec2::X, gravity)
            }
        };

        // Jump requests at fixed moments, including a double jump
        let jump = [2.0, 2.3, 6.5, 9.0]
            .iter()
            .any(|&at| (t - at).abs() < 0.5 / 60.0);

        Self {
            input: MoveInput::new(intent, camera),
            gravity,
            jump,
        }
    }
}
