//! Lifecycle of the animated star field.
//!
//! ```text
//! Detached --attach(surface)--> Running --detach()--> Detached
//! ```
//!
//! While running, every frame re-renders the [`Starfield`] and every
//! viewport resize regenerates its static layer. `detach()` cancels the
//! pending frame, removes the resize listener and drops the streaks in
//! flight; afterwards no tick runs. If the host refuses to schedule the
//! first frame, `attach` rolls back to Detached.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::frame_loop::FrameLoop;
use super::particles::{StaticParticle, StreakParticle};
use super::starfield::Starfield;
use super::surface::{DrawContext, FrameScheduler, ListenerHandle, ResizeNotifier, Surface};
use crate::config::StarfieldConfig;

struct Binding {
    surface: Rc<dyn Surface>,
    context: Rc<dyn DrawContext>,
    listener: Option<ListenerHandle>,
}

struct Shared<R: Rng> {
    frames: FrameLoop,
    resize: Rc<dyn ResizeNotifier>,
    scene: RefCell<Starfield<R>>,
    binding: RefCell<Option<Binding>>,
}

pub struct BackgroundAnimator<R: Rng + 'static = StdRng> {
    shared: Rc<Shared<R>>,
}

impl BackgroundAnimator<StdRng> {
    pub fn new(
        scheduler: Rc<dyn FrameScheduler>,
        resize: Rc<dyn ResizeNotifier>,
        config: StarfieldConfig,
    ) -> Self {
        Self::with_rng(scheduler, resize, config, StdRng::from_entropy())
    }
}

impl<R: Rng + 'static> BackgroundAnimator<R> {
    pub fn with_rng(
        scheduler: Rc<dyn FrameScheduler>,
        resize: Rc<dyn ResizeNotifier>,
        config: StarfieldConfig,
        rng: R,
    ) -> Self {
        Self {
            shared: Rc::new(Shared {
                frames: FrameLoop::new(scheduler),
                resize,
                scene: RefCell::new(Starfield::new(config, rng)),
                binding: RefCell::new(None),
            }),
        }
    }

    /// Bind to `surface` and start animating. Does nothing when already
    /// running or when the surface has no drawing context.
    pub fn attach(&self, surface: Rc<dyn Surface>) {
        if self.is_running() {
            crate::console_log!(log_1, "Background animator already attached");
            return;
        }
        let Some(context) = surface.context() else {
            crate::console_log!(log_1, "No 2D context available, background stays idle");
            return;
        };
        if self.shared.binding.borrow().is_some() {
            // left behind by a loop the host stopped scheduling
            self.detach();
        }

        let weak = Rc::downgrade(&self.shared);
        let listener = self.shared.resize.subscribe(Rc::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_resize();
            }
        }));

        *self.shared.binding.borrow_mut() = Some(Binding { surface, context, listener });

        self.shared.on_resize();
        self.shared.tick();

        let weak: Weak<Shared<R>> = Rc::downgrade(&self.shared);
        self.shared.frames.start(Rc::new(move |_: f64| {
            if let Some(shared) = weak.upgrade() {
                shared.tick();
            }
        }));
        if !self.shared.frames.is_running() {
            crate::console_log!(warn_1, "Frame scheduling refused, background detached");
            self.detach();
        }
    }

    /// Match the surface to the viewport and regenerate the static stars.
    pub fn on_resize(&self) {
        self.shared.on_resize();
    }

    /// Render one frame. A no-op while detached.
    pub fn tick(&self) {
        self.shared.tick();
    }

    /// Stop the loop, drop the resize listener and clear the streaks in
    /// flight. Idempotent.
    pub fn detach(&self) {
        self.shared.frames.stop();
        self.shared.scene.borrow_mut().clear_streaks();
        let binding = self.shared.binding.borrow_mut().take();
        if let Some(Binding { listener: Some(listener), .. }) = binding {
            self.shared.resize.unsubscribe(listener);
            crate::console_log!(log_1, "Background animator detached");
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.binding.borrow().is_some() && self.shared.frames.is_running()
    }

    pub fn star_count(&self) -> usize {
        self.shared.scene.borrow().stars().len()
    }

    pub fn streak_count(&self) -> usize {
        self.shared.scene.borrow().streaks().len()
    }

    pub fn stars(&self) -> Vec<StaticParticle> {
        self.shared.scene.borrow().stars().to_vec()
    }

    pub fn streaks(&self) -> Vec<StreakParticle> {
        self.shared.scene.borrow().streaks().to_vec()
    }
}

impl<R: Rng + 'static> Drop for BackgroundAnimator<R> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<R: Rng> Shared<R> {
    fn surface(&self) -> Option<Rc<dyn Surface>> {
        self.binding.borrow().as_ref().map(|b| b.surface.clone())
    }

    fn on_resize(&self) {
        let Some(surface) = self.surface() else {
            return;
        };
        let (width, height) = surface.viewport_size();
        surface.set_size(width, height);
        self.scene.borrow_mut().resize(width, height);
    }

    fn tick(&self) {
        let context = match self.binding.borrow().as_ref() {
            Some(binding) => binding.context.clone(),
            None => return,
        };
        self.scene.borrow_mut().render(&*context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::frame_loop::tests::ManualScheduler;
    use crate::canvas::starfield::tests::RecordingContext;
    use std::cell::Cell;

    #[derive(Default)]
    struct ManualResize {
        next_id: Cell<u32>,
        listeners: RefCell<Vec<(u32, Rc<dyn Fn()>)>>,
    }

    impl ManualResize {
        fn fire(&self) {
            let listeners: Vec<_> = self.listeners.borrow().iter().map(|(_, l)| l.clone()).collect();
            for listener in listeners {
                listener();
            }
        }

        fn count(&self) -> usize {
            self.listeners.borrow().len()
        }
    }

    impl ResizeNotifier for ManualResize {
        fn subscribe(&self, callback: Rc<dyn Fn()>) -> Option<ListenerHandle> {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            self.listeners.borrow_mut().push((id, callback));
            Some(ListenerHandle(id))
        }

        fn unsubscribe(&self, handle: ListenerHandle) {
            self.listeners.borrow_mut().retain(|(id, _)| *id != handle.0);
        }
    }

    struct FakeSurface {
        viewport: Cell<(u32, u32)>,
        backing: Cell<(u32, u32)>,
        context: Option<Rc<RecordingContext>>,
    }

    impl FakeSurface {
        fn new(width: u32, height: u32) -> Rc<Self> {
            Rc::new(Self {
                viewport: Cell::new((width, height)),
                backing: Cell::new((300, 150)),
                context: Some(Rc::new(RecordingContext::default())),
            })
        }

        fn without_context() -> Rc<Self> {
            Rc::new(Self {
                viewport: Cell::new((800, 600)),
                backing: Cell::new((300, 150)),
                context: None,
            })
        }

        fn clears(&self) -> usize {
            self.context.as_ref().map_or(0, |c| *c.clears.borrow())
        }
    }

    impl Surface for FakeSurface {
        fn context(&self) -> Option<Rc<dyn DrawContext>> {
            self.context.clone().map(|c| c as Rc<dyn DrawContext>)
        }

        fn viewport_size(&self) -> (u32, u32) {
            self.viewport.get()
        }

        fn set_size(&self, width: u32, height: u32) {
            self.backing.set((width, height));
        }

        fn size(&self) -> (u32, u32) {
            self.backing.get()
        }
    }

    struct Harness {
        scheduler: Rc<ManualScheduler>,
        resize: Rc<ManualResize>,
        animator: BackgroundAnimator<StdRng>,
    }

    fn harness(config: StarfieldConfig) -> Harness {
        let scheduler = Rc::new(ManualScheduler::default());
        let resize = Rc::new(ManualResize::default());
        let animator = BackgroundAnimator::with_rng(
            scheduler.clone(),
            resize.clone(),
            config,
            StdRng::seed_from_u64(42),
        );
        Harness { scheduler, resize, animator }
    }

    fn quiet() -> StarfieldConfig {
        StarfieldConfig { spawn_probability: 0.0, ..StarfieldConfig::default() }
    }

    #[test]
    fn missing_context_never_starts() {
        let h = harness(quiet());
        h.animator.attach(FakeSurface::without_context());
        assert!(!h.animator.is_running());
        assert_eq!(h.resize.count(), 0);
        assert_eq!(h.scheduler.pending(), 0);
        assert_eq!(h.animator.star_count(), 0);
    }

    #[test]
    fn attach_sizes_surface_and_starts_loop() {
        let h = harness(quiet());
        let surface = FakeSurface::new(1000, 1000);
        h.animator.attach(surface.clone());

        assert!(h.animator.is_running());
        assert_eq!(surface.size(), (1000, 1000));
        assert_eq!(h.animator.star_count(), 1000);
        assert!(h
            .animator
            .stars()
            .iter()
            .all(|s| (0.0..1000.0).contains(&s.x) && (0.0..1000.0).contains(&s.y)));
        assert_eq!(h.resize.count(), 1);
        assert_eq!(h.scheduler.pending(), 1);
        // initial frame is drawn synchronously
        assert_eq!(surface.clears(), 1);

        for _ in 0..3 {
            h.scheduler.advance(16.0);
        }
        assert_eq!(surface.clears(), 4);
    }

    #[test]
    fn resize_regenerates_stars_and_keeps_streaks() {
        let h = harness(StarfieldConfig { spawn_probability: 1.0, ..StarfieldConfig::default() });
        let surface = FakeSurface::new(1000, 1000);
        h.animator.attach(surface.clone());
        h.scheduler.advance(16.0);
        let streaks = h.animator.streak_count();
        assert_eq!(streaks, 2);

        surface.viewport.set((500, 400));
        h.resize.fire();

        assert_eq!(surface.size(), (500, 400));
        assert_eq!(h.animator.star_count(), 200);
        assert_eq!(h.animator.streak_count(), streaks);
    }

    #[test]
    fn detach_stops_drawing() {
        let h = harness(quiet());
        let surface = FakeSurface::new(400, 300);
        h.animator.attach(surface.clone());
        h.scheduler.advance(16.0);
        let drawn = surface.clears();

        h.animator.detach();
        assert!(!h.animator.is_running());
        assert_eq!(h.resize.count(), 0);
        for _ in 0..5 {
            h.scheduler.advance(16.0);
        }
        assert_eq!(surface.clears(), drawn);

        // resize after detach is ignored as well
        surface.viewport.set((100, 100));
        h.resize.fire();
        assert_eq!(h.animator.star_count(), 120);
    }

    #[test]
    fn detach_holds_even_if_host_keeps_the_frame() {
        let h = harness(quiet());
        h.scheduler.ignore_cancel.set(true);
        let surface = FakeSurface::new(400, 300);
        h.animator.attach(surface.clone());
        h.animator.detach();

        assert_eq!(h.scheduler.pending(), 1);
        h.scheduler.advance(16.0);
        assert_eq!(surface.clears(), 1);
    }

    #[test]
    fn detach_twice_is_harmless() {
        let h = harness(quiet());
        h.animator.detach();
        h.animator.attach(FakeSurface::new(100, 100));
        h.animator.detach();
        h.animator.detach();
        assert!(!h.animator.is_running());
        assert_eq!(h.resize.count(), 0);
        assert_eq!(h.scheduler.cancelled.get(), 1);
    }

    #[test]
    fn second_attach_is_ignored() {
        let h = harness(quiet());
        let first = FakeSurface::new(100, 100);
        let second = FakeSurface::new(2000, 2000);
        h.animator.attach(first.clone());
        h.animator.attach(second.clone());

        assert_eq!(h.resize.count(), 1);
        assert_eq!(h.scheduler.pending(), 1);
        assert_eq!(h.animator.star_count(), 10);
        assert_eq!(second.clears(), 0);
    }

    #[test]
    fn can_reattach_after_detach() {
        let h = harness(quiet());
        let surface = FakeSurface::new(100, 100);
        h.animator.attach(surface.clone());
        h.animator.detach();
        h.animator.attach(surface.clone());

        assert!(h.animator.is_running());
        h.scheduler.advance(16.0);
        assert_eq!(surface.clears(), 3);
    }

    #[test]
    fn refused_first_frame_leaves_animator_detached() {
        let h = harness(quiet());
        h.scheduler.reject.set(true);
        let surface = FakeSurface::new(200, 100);
        h.animator.attach(surface.clone());

        assert!(!h.animator.is_running());
        assert_eq!(h.resize.count(), 0);
        assert_eq!(h.scheduler.pending(), 0);

        h.scheduler.reject.set(false);
        h.animator.attach(surface.clone());
        assert!(h.animator.is_running());
        assert_eq!(h.resize.count(), 1);
        assert_eq!(h.scheduler.pending(), 1);

        let drawn = surface.clears();
        h.scheduler.advance(16.0);
        assert_eq!(surface.clears(), drawn + 1);
    }

    #[test]
    fn reattach_starts_without_old_streaks() {
        let h = harness(StarfieldConfig { spawn_probability: 1.0, ..StarfieldConfig::default() });
        let surface = FakeSurface::new(800, 600);
        h.animator.attach(surface.clone());
        for _ in 0..3 {
            h.scheduler.advance(16.0);
        }
        assert!(h.animator.streak_count() > 0);

        h.animator.detach();
        assert_eq!(h.animator.streak_count(), 0);

        // the synchronous first frame spawns exactly one
        h.animator.attach(surface);
        assert_eq!(h.animator.streak_count(), 1);
    }

    #[test]
    fn streaks_never_linger_dead() {
        let h = harness(StarfieldConfig { spawn_probability: 0.2, ..StarfieldConfig::default() });
        h.animator.attach(FakeSurface::new(640, 480));
        for _ in 0..500 {
            h.scheduler.advance(16.0);
            assert!(h.animator.streaks().iter().all(|s| s.life > 0.0));
        }
    }

    #[test]
    fn dropping_the_animator_tears_down() {
        let h = harness(quiet());
        let surface = FakeSurface::new(100, 100);
        h.animator.attach(surface.clone());
        let Harness { scheduler, resize, animator } = h;
        drop(animator);

        assert_eq!(resize.count(), 0);
        scheduler.advance(16.0);
        assert_eq!(surface.clears(), 1);
    }
}
