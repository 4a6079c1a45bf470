use clap::ValueEnum;
use rand::Rng;

use crate::camera::Camera;
use crate::controls::OrbitControls;
use crate::page::Page;
use crate::system::SolarSystem;

/// Scroll position past which the tour ends and free roam begins.
pub const END_THRESHOLD: f32 = -6100.0;
/// Vantage point the camera jumps to when the tour ends.
pub const FREE_ROAM_EYE: glam::Vec3 = glam::Vec3::new(50.0, 0.0, 90.0);
/// Starting and post-teardown camera position.
pub const REST_EYE: glam::Vec3 = glam::Vec3::new(0.0, 0.0, 30.0);

/// The two constant sets the tour ships with.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    #[default]
    Classic,
    Dense,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TourTuning {
    /// Scroll offset to camera x (and y, the two are coupled).
    pub pan_factor: f32,
    /// Scroll offset to camera z.
    pub zoom_factor: f32,
    /// Per-scroll-event rotation increment on x and y.
    pub scroll_spin: glam::Vec2,
    /// Per-frame rotation base increment per axis.
    pub idle_base: f32,
    /// Upper bound of the uniform per-frame, per-axis rotation jitter.
    pub idle_jitter: f32,
    /// Edge length of the cube the starfield scatters over.
    pub starfield_spread: f32,
}

impl TourTuning {
    pub fn classic() -> Self {
        TourTuning {
            pan_factor: -0.0001,
            zoom_factor: -0.01,
            scroll_spin: glam::Vec2::new(0.005, 0.007),
            idle_base: 0.0009,
            idle_jitter: 0.0001,
            starfield_spread: 150.0,
        }
    }

    pub fn dense() -> Self {
        TourTuning {
            pan_factor: -0.0002,
            zoom_factor: -0.01,
            scroll_spin: glam::Vec2::new(0.005, 0.005),
            idle_base: 0.0005,
            idle_jitter: 0.001,
            starfield_spread: 100.0,
        }
    }

    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Classic => Self::classic(),
            Preset::Dense => Self::dense(),
        }
    }
}

/// One-way tour state. `FreeRoam` is terminal; nothing ever resets it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TourPhase {
    Exploring,
    FreeRoam,
}

/// The scroll/animation controller. Owns the phase and the tuning; the page,
/// bodies, camera and orbit controls are passed in, so the mapping logic runs
/// without a GPU.
pub struct TourController {
    phase: TourPhase,
    tuning: TourTuning,
}

impl TourController {
    pub fn new(tuning: TourTuning) -> Self {
        TourController {
            phase: TourPhase::Exploring,
            tuning,
        }
    }

    pub fn phase(&self) -> TourPhase {
        self.phase
    }

    pub fn tuning(&self) -> &TourTuning {
        &self.tuning
    }

    /// The scroll handler: spins the bodies, maps the scroll offset linearly
    /// onto the camera (x and y coupled, no clamping), and crosses into free
    /// roam once the offset passes the end threshold. Returns whether this
    /// call entered free roam; the transition fires at most once.
    pub fn on_scroll(
        &mut self,
        scroll_top: f32,
        system: &mut SolarSystem,
        camera: &mut Camera,
        controls: &mut OrbitControls,
    ) -> bool {
        system.spin_all(self.tuning.scroll_spin.x, self.tuning.scroll_spin.y);

        camera.eye.x = scroll_top * self.tuning.pan_factor;
        camera.eye.y = camera.eye.x;
        camera.eye.z = scroll_top * self.tuning.zoom_factor;

        let mut entered_free_roam = false;
        if scroll_top < END_THRESHOLD && self.phase == TourPhase::Exploring {
            log::info!("end of the tour reached, free roam unlocked: drag with the mouse to pan");
            camera.eye = FREE_ROAM_EYE;
            self.phase = TourPhase::FreeRoam;
            entered_free_roam = true;
        }

        controls.sync();
        entered_free_roam
    }

    /// The per-frame step. On the first tick after entering free roam the
    /// camera settles at the rest position, the page's main region goes away
    /// and the scroll handler is detached; the whole block is guarded by the
    /// main region still being attached, so later ticks leave a dragged
    /// camera alone. Every tick nudges every body's rotation by the base
    /// increment plus a non-negative jitter, independently per axis.
    pub fn tick(
        &mut self,
        page: &mut Page,
        system: &mut SolarSystem,
        camera: &mut Camera,
        controls: &mut OrbitControls,
        rng: &mut impl Rng,
    ) {
        if self.phase == TourPhase::FreeRoam && page.is_main_attached() {
            camera.eye = REST_EYE;
            page.remove_main();
            page.detach_scroll_handler();
            controls.sync();
        }

        for body in system.bodies_mut() {
            body.rotation.x += self.tuning.idle_base + rng.random::<f32>() * self.tuning.idle_jitter;
            body.rotation.y += self.tuning.idle_base + rng.random::<f32>() * self.tuning.idle_jitter;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    struct Fixture {
        page: Page,
        system: SolarSystem,
        camera: Camera,
        controls: OrbitControls,
        tour: TourController,
    }

    fn fixture(tuning: TourTuning) -> Fixture {
        Fixture {
            page: Page::new(8000.0),
            system: SolarSystem::new(),
            camera: Camera::new(REST_EYE, 16.0 / 9.0),
            controls: OrbitControls::new(),
            tour: TourController::new(tuning),
        }
    }

    #[test]
    fn camera_mapping_is_linear_with_coupled_x_and_y() {
        for tuning in [TourTuning::classic(), TourTuning::dense()] {
            let mut f = fixture(tuning);
            for offset in [0.0, -100.0, -2500.0, -6000.0] {
                f.tour
                    .on_scroll(offset, &mut f.system, &mut f.camera, &mut f.controls);
                assert_relative_eq!(f.camera.eye.x, offset * tuning.pan_factor);
                assert_eq!(f.camera.eye.y, f.camera.eye.x);
                assert_relative_eq!(f.camera.eye.z, offset * tuning.zoom_factor);
            }
        }
    }

    #[test]
    fn scroll_spins_every_body_by_the_tuned_increment() {
        let mut f = fixture(TourTuning::classic());
        f.tour
            .on_scroll(-50.0, &mut f.system, &mut f.camera, &mut f.controls);
        for body in f.system.bodies() {
            assert_relative_eq!(body.rotation.x, 0.005);
            assert_relative_eq!(body.rotation.y, 0.007);
        }
    }

    #[test]
    fn free_roam_transition_fires_exactly_once() {
        let mut f = fixture(TourTuning::classic());
        assert!(!f
            .tour
            .on_scroll(-6000.0, &mut f.system, &mut f.camera, &mut f.controls));
        assert_eq!(f.tour.phase(), TourPhase::Exploring);

        assert!(f
            .tour
            .on_scroll(-6200.0, &mut f.system, &mut f.camera, &mut f.controls));
        assert_eq!(f.tour.phase(), TourPhase::FreeRoam);
        assert_eq!(f.camera.eye, FREE_ROAM_EYE);

        // Crossing the threshold again stays silent and keeps the phase.
        assert!(!f
            .tour
            .on_scroll(-6500.0, &mut f.system, &mut f.camera, &mut f.controls));
        assert!(!f
            .tour
            .on_scroll(-7000.0, &mut f.system, &mut f.camera, &mut f.controls));
        assert_eq!(f.tour.phase(), TourPhase::FreeRoam);
    }

    #[test]
    fn idle_rotation_is_monotone_with_at_least_the_base_increment() {
        let mut f = fixture(TourTuning::classic());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let before: Vec<glam::Vec3> = f.system.bodies().iter().map(|b| b.rotation).collect();
        f.tour.tick(
            &mut f.page,
            &mut f.system,
            &mut f.camera,
            &mut f.controls,
            &mut rng,
        );
        for (body, before) in f.system.bodies().iter().zip(before) {
            let dx = body.rotation.x - before.x;
            let dy = body.rotation.y - before.y;
            assert!(dx >= f.tour.tuning().idle_base);
            assert!(dy >= f.tour.tuning().idle_base);
            assert!(dx < f.tour.tuning().idle_base + f.tour.tuning().idle_jitter);
            assert!(dy < f.tour.tuning().idle_base + f.tour.tuning().idle_jitter);
        }
    }

    #[test]
    fn teardown_runs_once_and_leaves_a_roaming_camera_alone() {
        let mut f = fixture(TourTuning::classic());
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        f.tour
            .on_scroll(-6200.0, &mut f.system, &mut f.camera, &mut f.controls);

        f.tour.tick(
            &mut f.page,
            &mut f.system,
            &mut f.camera,
            &mut f.controls,
            &mut rng,
        );
        assert_eq!(f.camera.eye, REST_EYE);
        assert!(!f.page.is_main_attached());
        assert!(!f.page.is_handler_attached());

        // A dragged camera stays put on later ticks.
        f.camera.eye = glam::Vec3::new(10.0, 5.0, 20.0);
        f.tour.tick(
            &mut f.page,
            &mut f.system,
            &mut f.camera,
            &mut f.controls,
            &mut rng,
        );
        assert_eq!(f.camera.eye, glam::Vec3::new(10.0, 5.0, 20.0));
    }

    #[test]
    fn full_tour_scenario() {
        let mut f = fixture(TourTuning::classic());
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        assert_eq!(
            f.system.body("earth").unwrap().position,
            glam::Vec3::new(0.0, 0.0, 21.0)
        );

        f.tour
            .on_scroll(0.0, &mut f.system, &mut f.camera, &mut f.controls);
        assert_eq!(f.camera.eye, glam::Vec3::ZERO);

        assert!(f
            .tour
            .on_scroll(-7000.0, &mut f.system, &mut f.camera, &mut f.controls));
        assert_eq!(f.camera.eye, FREE_ROAM_EYE);

        f.tour.tick(
            &mut f.page,
            &mut f.system,
            &mut f.camera,
            &mut f.controls,
            &mut rng,
        );
        assert_eq!(f.camera.eye, REST_EYE);
        assert!(!f.page.is_main_attached());
    }

    #[test]
    fn preset_constants_match_the_source_variants() {
        let classic = TourTuning::classic();
        assert_eq!(classic.pan_factor, -0.0001);
        assert_eq!(classic.zoom_factor, -0.01);
        assert_eq!(classic.scroll_spin, glam::Vec2::new(0.005, 0.007));
        assert_eq!(classic.starfield_spread, 150.0);

        let dense = TourTuning::dense();
        assert_eq!(dense.pan_factor, -0.0002);
        assert_eq!(dense.zoom_factor, -0.01);
        assert_eq!(dense.starfield_spread, 100.0);

        assert_eq!(TourTuning::preset(Preset::Classic), classic);
        assert_eq!(TourTuning::preset(Preset::Dense), dense);
    }
}
