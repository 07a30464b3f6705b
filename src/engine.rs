use std::path::PathBuf;

use thiserror::Error;

use crate::Coord;
use crate::field::CellOp;
use crate::field::Field;
use crate::field::FieldError;
use crate::preset::Preset;
use crate::preset::PresetError;
use crate::rule;
use crate::rule::RuleSet;

/// How the engine's initial state is produced, decided once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Built-in glider seed, rule B3/S23.
    Default,

    /// Seed and (optionally) rule from a preset file.
    File(PathBuf),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Preset(#[from] PresetError),
}

/// The state-transition engine. Owns one [`Field`] and one [`RuleSet`] and
/// advances the world a generation at a time.
pub struct Engine {
    field: Field,
    rule: RuleSet,

    /// Cell-op queue, filled by the scan phase and drained by the apply
    /// phase of a single `tick` or load. Kept around only to reuse the
    /// allocation; it is always empty between calls.
    ops: Vec<CellOp>,
}

impl Engine {
    /// An empty `n` by `m` engine with the given rule.
    pub fn new(n: Coord, m: Coord, rule: RuleSet) -> Result<Self, FieldError> {
        Ok(Self {
            field: Field::new(n, m)?,
            rule,
            ops: Vec::new(),
        })
    }

    /// Build an engine for the given startup mode. In `File` mode the
    /// parsed preset is returned too, so the driver can show its name and
    /// warnings; a missing file aborts with no engine constructed.
    pub fn from_mode(
        mode: &Mode,
        n: Coord,
        m: Coord,
    ) -> Result<(Self, Option<Preset>), EngineError> {
        let mut engine = Self::new(n, m, rule::B3S23)?;

        match mode {
            Mode::Default => {
                engine.load_default();

                Ok((engine, None))
            }
            Mode::File(path) => {
                let preset = Preset::from_path(path)?;
                engine.load_preset(&preset);

                Ok((engine, Some(preset)))
            }
        }
    }

    pub fn height(&self) -> usize {
        self.field.height()
    }

    pub fn width(&self) -> usize {
        self.field.width()
    }

    pub fn rule(&self) -> RuleSet {
        self.rule
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn is_alive(&self, x: Coord, y: Coord) -> bool {
        self.field.get(x, y)
    }

    /// Stored coordinates of every live cell, row-major.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.field.live_cells()
    }

    /// Advance the world one generation.
    ///
    /// Runs in two phases. The scan phase reads the current grid only,
    /// enqueueing an op for every cell whose state changes; the apply phase
    /// then drains the queue in scan order. Because nothing is written
    /// until the scan is complete, every decision sees the pre-tick
    /// generation, whatever order the grid is walked in.
    pub fn tick(&mut self) {
        self.scan();
        self.apply_ops();
    }

    /// Clear the field, apply the preset's cell ops in file order, then
    /// adopt its rule. A preset without a `#R` line resets the rule to
    /// B3/S23.
    pub fn load_preset(&mut self, preset: &Preset) {
        self.field.clear();

        for &op in &preset.ops {
            self.field.apply(op);
        }

        self.rule = preset.rule.unwrap_or(rule::B3S23);
    }

    /// Clear the field and plant the built-in glider. The current rule is
    /// kept, unlike [`Engine::load_preset`].
    pub fn load_default(&mut self) {
        self.field.seed_default();
    }

    /// Live neighbors among the 8 toroidal neighbors of `(x, y)`.
    ///
    /// Neighbors of edge cells come from the opposite edge; `Field::get`
    /// normalizes, so the offsets below need no clamping.
    fn neighbor_count(&self, x: Coord, y: Coord) -> u8 {
        let mut count = 0;

        for i in x - 1..=x + 1 {
            for j in y - 1..=y + 1 {
                if i == x && j == y {
                    continue;
                }

                count += self.field.get(i, j) as u8;
            }
        }

        count
    }

    /// Scan phase: row-major walk over the grid, queueing every change.
    fn scan(&mut self) {
        debug_assert!(self.ops.is_empty());

        for i in 0..self.field.height() as Coord {
            for j in 0..self.field.width() as Coord {
                let count = self.neighbor_count(i, j);
                let alive = self.field.get(i, j);

                let next = (alive && self.rule.survives(count)) || self.rule.born(count);

                if next != alive {
                    self.ops.push(CellOp {
                        x: i,
                        y: j,
                        alive: next,
                    });
                }
            }
        }
    }

    /// Apply phase: drain the queue in production order.
    fn apply_ops(&mut self) {
        for op in self.ops.drain(..) {
            self.field.apply(op);
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::Engine;
    use super::Mode;
    use crate::preset::Preset;
    use crate::rule;
    use crate::rule::RuleSet;

    fn live(engine: &Engine) -> Vec<(usize, usize)> {
        engine.live_cells().collect()
    }

    #[test]
    fn blinker_oscillates() {
        let mut engine = Engine::new(10, 10, rule::B3S23).unwrap();
        let preset = Preset::parse("Blinker\n#R B3/S23\n0 1\n1 1\n2 1\n");

        engine.load_preset(&preset);
        assert_eq!(live(&engine), vec![(0, 1), (1, 1), (2, 1)]);

        engine.tick();
        assert_eq!(live(&engine), vec![(1, 0), (1, 1), (1, 2)]);

        engine.tick();
        assert_eq!(live(&engine), vec![(0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn block_is_still() {
        let mut engine = Engine::new(8, 8, rule::B3S23).unwrap();
        let preset = Preset::parse("Block\n1 1\n1 2\n2 1\n2 2\n");

        engine.load_preset(&preset);
        engine.tick();

        assert_eq!(live(&engine), vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn neighbors_wrap_around_edges() {
        // Blinker across the top edge: live column at rows 9, 0, 1
        let mut engine = Engine::new(10, 10, rule::B3S23).unwrap();
        let preset = Preset::parse("Wrap\n-1 4\n0 4\n1 4\n");

        engine.load_preset(&preset);
        engine.tick();

        assert_eq!(live(&engine), vec![(0, 3), (0, 4), (0, 5)]);
    }

    #[test]
    fn load_preset_replaces_rule_and_default_keeps_it() {
        let mut engine = Engine::new(10, 10, rule::B3S23).unwrap();

        let preset = Preset::parse("HighLife\n#R B36/S23\n");
        engine.load_preset(&preset);
        assert_eq!(engine.rule(), "B36/S23".parse::<RuleSet>().unwrap());

        engine.load_default();
        assert_eq!(engine.rule(), "B36/S23".parse::<RuleSet>().unwrap());

        // No #R line: back to B3/S23
        let preset = Preset::parse("Plain\n1 1\n");
        engine.load_preset(&preset);
        assert_eq!(engine.rule(), rule::B3S23);
    }

    #[test]
    fn birth_zero_fills_an_empty_world() {
        // B0 births cells from nothing; not special-cased.
        let mut engine = Engine::new(4, 4, "B0/S8".parse().unwrap()).unwrap();

        engine.tick();

        assert_eq!(live(&engine).len(), 16);
    }

    #[test]
    fn default_mode_seeds_glider() {
        let (engine, preset) = Engine::from_mode(&Mode::Default, 20, 60).unwrap();

        assert!(preset.is_none());
        assert_eq!(engine.rule(), rule::B3S23);
        assert_eq!(engine.live_cells().count(), 5);
    }

    #[test]
    fn file_mode_missing_file_builds_nothing() {
        let mode = Mode::File("no/such/file.life".into());

        assert!(Engine::from_mode(&mode, 20, 60).is_err());
    }

    proptest! {
        // Same grid, same rule: tick is a pure function of the generation.
        #[test]
        fn tick_is_deterministic(cells in proptest::collection::vec((0i64..12, 0i64..12), 0..40)) {
            let preset_text: String = std::iter::once("Gen".to_string())
                .chain(cells.iter().map(|(x, y)| format!("{x} {y}")))
                .collect::<Vec<_>>()
                .join("\n");

            let preset = Preset::parse(&preset_text);

            let mut a = Engine::new(12, 12, rule::B3S23).unwrap();
            let mut b = Engine::new(12, 12, rule::B3S23).unwrap();

            a.load_preset(&preset);
            b.load_preset(&preset);

            a.tick();
            b.tick();

            prop_assert_eq!(live(&a), live(&b));
        }
    }
}
