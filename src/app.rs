use crate::render::{draw_grid, draw_text, Terminal};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::Color;
use petridish::Grid;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

pub(crate) struct App {
    grid: Grid,
    seed: u64,
    generation: u64,
    step_ms: u64,
    paused: bool,
    term: Terminal,
    should_quit: bool,
}

fn new_grid(size: usize, seed: u64) -> Result<Grid> {
    let mut rng = StdRng::seed_from_u64(seed);
    Grid::new(size, &mut rng)
}

impl App {
    fn init(size: usize, step_ms: u64, seed: u64) -> Result<Self> {
        // seed the board before touching the terminal, so a bad --size
        // errors onto a normal screen
        let grid = new_grid(size, seed)?;
        let term = Terminal::begin()?;

        Ok(Self {
            grid,
            seed,
            generation: 0,
            step_ms: step_ms.max(1),
            paused: false,
            term,
            should_quit: false,
        })
    }

    fn run(&mut self) -> Result<()> {
        let frame_dt = Duration::from_millis(16);

        let mut last_frame = Instant::now();
        let mut sim_accum = Duration::ZERO;

        let mut frames = 0u32;
        let mut fps_timer = Instant::now();
        let mut fps: f32 = 0.0;

        // the seed soup is shown as generation 0 before anything advances
        self.render_frame(fps)?;

        while !self.should_quit {
            self.term.resize_if_needed()?;
            self.handle_input()?;

            // sim fixed-step: the board only ever advances whole generations
            let now = Instant::now();
            let real_dt = now.saturating_duration_since(last_frame);
            last_frame = now;

            if self.paused {
                sim_accum = Duration::ZERO;
            } else {
                sim_accum = sim_accum.saturating_add(real_dt);
                let step = Duration::from_millis(self.step_ms);
                while sim_accum >= step {
                    self.step_once();
                    sim_accum = sim_accum.saturating_sub(step);
                }
            }

            self.render_frame(fps)?;

            // FPS estimate
            frames += 1;
            if fps_timer.elapsed() >= Duration::from_millis(500) {
                fps = frames as f32 / fps_timer.elapsed().as_secs_f32();
                fps_timer = Instant::now();
                frames = 0;
            }

            spin_sleep(frame_dt, Instant::now());
        }

        self.term.end()?;
        Ok(())
    }

    fn handle_input(&mut self) -> Result<()> {
        while event::poll(Duration::from_millis(1))? {
            match event::read()? {
                Event::Key(k) if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat => {
                    match k.code {
                        KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                        KeyCode::Char(' ') => self.paused = !self.paused,
                        KeyCode::Char('s') => {
                            if self.paused {
                                self.step_once();
                            }
                        }
                        KeyCode::Char('r') => self.reseed()?,
                        KeyCode::Char('-') => self.step_ms = (self.step_ms * 2).min(1000),
                        KeyCode::Char('=') | KeyCode::Char('+') => {
                            self.step_ms = (self.step_ms / 2).max(1)
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn step_once(&mut self) {
        self.grid.tick();
        self.generation += 1;
    }

    fn reseed(&mut self) -> Result<()> {
        self.seed = self.seed.wrapping_add(1);
        self.grid = new_grid(self.grid.size(), self.seed)?;
        self.generation = 0;
        Ok(())
    }

    fn render_frame(&mut self, fps: f32) -> Result<()> {
        self.term.cur.clear(Color::Black);
        draw_grid(&mut self.term.cur, &self.grid);

        let hud = format!(
            "petridish  gen:{}  pop:{}  grid:{}x{}  step:{}ms  seed:{}  paused:{}  fps:{:>5.1}  keys: Q quit  SPACE pause  S step  R reseed  -/= speed",
            self.generation,
            self.grid.population(),
            self.grid.size(),
            self.grid.size(),
            self.step_ms,
            self.seed,
            if self.paused { "yes" } else { "no " },
            fps
        );
        draw_text(&mut self.term.cur, 0, 0, &hud, Color::White, Color::Black);

        self.term.present(true)?;
        Ok(())
    }
}

pub(crate) fn run(size: usize, step_ms: u64, seed: u64) -> Result<()> {
    let mut app = App::init(size, step_ms, seed)?;
    app.run()?;
    Ok(())
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
