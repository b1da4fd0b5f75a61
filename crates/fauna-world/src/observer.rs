//! Read-only access to the field for displays and halt predicates.

use crate::arena::CreatureArena;
use crate::creature::Creature;
use crate::field::Field;
use fauna_core::{CreatureId, Location, Species};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use tracing::warn;

/// Receives the field after every step and decides whether a run goes on.
pub trait Observer {
    fn show_status(&mut self, step: u64, field: &FieldView<'_>);

    /// `simulate` stops early once this returns false
    fn is_viable(&self, field: &FieldView<'_>) -> bool;
}

impl<T: Observer + ?Sized> Observer for Box<T> {
    fn show_status(&mut self, step: u64, field: &FieldView<'_>) {
        (**self).show_status(step, field)
    }

    fn is_viable(&self, field: &FieldView<'_>) -> bool {
        (**self).is_viable(field)
    }
}

/// The field with its occupants resolved to creatures
#[derive(Clone, Copy)]
pub struct FieldView<'a> {
    field: &'a Field,
    creatures: &'a CreatureArena,
}

impl<'a> FieldView<'a> {
    pub(crate) fn new(field: &'a Field, creatures: &'a CreatureArena) -> Self {
        Self { field, creatures }
    }

    pub fn depth(&self) -> usize {
        self.field.depth()
    }

    pub fn width(&self) -> usize {
        self.field.width()
    }

    pub fn field(&self) -> &'a Field {
        self.field
    }

    pub fn occupant(&self, loc: Location) -> Option<CreatureId> {
        self.field.object_at(loc)
    }

    pub fn object_at(&self, loc: Location) -> Option<&'a Creature> {
        let creatures = self.creatures;
        self.field.object_at(loc).and_then(|id| creatures.get(id))
    }

    /// Occupied cells in row-major order
    pub fn occupants(&self) -> impl Iterator<Item = (Location, &'a Creature)> + 'a {
        let (field, creatures) = (self.field, self.creatures);
        field
            .iter()
            .filter_map(move |(loc, cell)| cell.and_then(|id| creatures.get(id)).map(|c| (loc, c)))
    }
}

/// Number of creatures of each species on the field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCount {
    pub rabbits: usize,
    pub foxes: usize,
}

impl PopulationCount {
    pub fn of(&self, species: Species) -> usize {
        match species {
            Species::Rabbit => self.rabbits,
            Species::Fox => self.foxes,
        }
    }

    pub fn total(&self) -> usize {
        self.rabbits + self.foxes
    }

    /// How many species have at least one member
    pub fn species_present(&self) -> usize {
        Species::ALL.iter().filter(|s| self.of(**s) > 0).count()
    }

    fn record(&mut self, species: Species) {
        match species {
            Species::Rabbit => self.rabbits += 1,
            Species::Fox => self.foxes += 1,
        }
    }
}

impl fmt::Display for PopulationCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Population:")?;
        for species in Species::ALL {
            write!(f, " {}: {}", species, self.of(species))?;
        }
        Ok(())
    }
}

/// Per-species counters with a history of every notified step.
///
/// A field is viable while more than one species is present.
#[derive(Debug, Clone, Default)]
pub struct FieldStats {
    latest: PopulationCount,
    history: Vec<(u64, PopulationCount)>,
}

impl FieldStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(field: &FieldView<'_>) -> PopulationCount {
        let mut counts = PopulationCount::default();
        for (_, creature) in field.occupants() {
            counts.record(creature.species());
        }
        counts
    }

    pub fn latest(&self) -> PopulationCount {
        self.latest
    }

    pub fn history(&self) -> &[(u64, PopulationCount)] {
        &self.history
    }
}

impl Observer for FieldStats {
    fn show_status(&mut self, step: u64, field: &FieldView<'_>) {
        self.latest = Self::count(field);
        self.history.push((step, self.latest));
    }

    fn is_viable(&self, field: &FieldView<'_>) -> bool {
        Self::count(field).species_present() > 1
    }
}

/// Ignores notifications and never halts a run
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn show_status(&mut self, _step: u64, _field: &FieldView<'_>) {}

    fn is_viable(&self, _field: &FieldView<'_>) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    Orange,
    Blue,
    Grey,
    Green,
    Red,
}

impl Colour {
    pub fn name(&self) -> &'static str {
        match self {
            Colour::Orange => "orange",
            Colour::Blue => "blue",
            Colour::Grey => "grey",
            Colour::Green => "green",
            Colour::Red => "red",
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a species is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub glyph: char,
    pub colour: Colour,
}

impl Token {
    pub const UNKNOWN: Token = Token {
        glyph: '?',
        colour: Colour::Grey,
    };
}

/// Display tokens registered per species
#[derive(Debug, Clone)]
pub struct Palette {
    tokens: HashMap<Species, Token>,
}

impl Palette {
    pub const EMPTY_GLYPH: char = '.';

    pub fn empty() -> Self {
        Self {
            tokens: HashMap::new(),
        }
    }

    pub fn set_token(&mut self, species: Species, token: Token) {
        self.tokens.insert(species, token);
    }

    /// Registered token, or grey `?` for an unregistered species
    pub fn token(&self, species: Species) -> Token {
        self.tokens.get(&species).copied().unwrap_or(Token::UNKNOWN)
    }
}

impl Default for Palette {
    fn default() -> Self {
        let mut palette = Self::empty();
        palette.set_token(
            Species::Rabbit,
            Token {
                glyph: 'R',
                colour: Colour::Orange,
            },
        );
        palette.set_token(
            Species::Fox,
            Token {
                glyph: 'F',
                colour: Colour::Blue,
            },
        );
        palette
    }
}

/// Writes a status line per step and an ASCII frame every `render_every` steps
pub struct TextView<W: Write> {
    out: W,
    palette: Palette,
    stats: FieldStats,
    render_every: u64,
}

impl<W: Write> TextView<W> {
    pub fn new(out: W, render_every: u64) -> Self {
        Self {
            out,
            palette: Palette::default(),
            stats: FieldStats::new(),
            render_every,
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn stats(&self) -> &FieldStats {
        &self.stats
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Draw the field, one line per row
    pub fn render(&self, field: &FieldView<'_>) -> String {
        let mut frame = String::with_capacity((field.width() + 1) * field.depth());
        for row in 0..field.depth() {
            for col in 0..field.width() {
                let glyph = match field.object_at(Location::new(row, col)) {
                    Some(creature) => self.palette.token(creature.species()).glyph,
                    None => Palette::EMPTY_GLYPH,
                };
                frame.push(glyph);
            }
            frame.push('\n');
        }
        frame
    }

    fn legend(&self) -> String {
        Species::ALL
            .iter()
            .map(|s| {
                let token = self.palette.token(*s);
                format!("{} = {} ({})", token.glyph, s, token.colour)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn write_status(&mut self, step: u64, field: &FieldView<'_>) -> std::io::Result<()> {
        writeln!(self.out, "Step: {} {}", step, self.stats.latest())?;
        if self.render_every > 0 && step % self.render_every == 0 {
            let frame = self.render(field);
            writeln!(self.out, "{}", self.legend())?;
            self.out.write_all(frame.as_bytes())?;
        }
        self.out.flush()
    }
}

impl<W: Write> Observer for TextView<W> {
    fn show_status(&mut self, step: u64, field: &FieldView<'_>) {
        self.stats.show_status(step, field);
        if let Err(e) = self.write_status(step, field) {
            warn!("Failed to write status for step {}: {}", step, e);
        }
    }

    fn is_viable(&self, field: &FieldView<'_>) -> bool {
        self.stats.is_viable(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Field, CreatureArena) {
        let mut field = Field::new(2, 3);
        let mut creatures = CreatureArena::new();
        let rabbit_loc = Location::new(0, 1);
        let fox_loc = Location::new(1, 2);
        let rabbit = creatures.insert(Creature::rabbit(rabbit_loc, 0, 0));
        let fox = creatures.insert(Creature::fox(fox_loc, 0, 7, 0));
        field.place(rabbit, rabbit_loc);
        field.place(fox, fox_loc);
        (field, creatures)
    }

    #[test]
    fn test_view_resolves_occupants() {
        let (field, creatures) = sample();
        let view = FieldView::new(&field, &creatures);

        assert_eq!(
            view.object_at(Location::new(0, 1)).map(Creature::species),
            Some(Species::Rabbit)
        );
        assert!(view.object_at(Location::new(0, 0)).is_none());
        assert_eq!(view.occupants().count(), 2);
    }

    #[test]
    fn test_field_stats_counts_and_viability() {
        let (mut field, creatures) = sample();
        let mut stats = FieldStats::new();

        stats.show_status(4, &FieldView::new(&field, &creatures));
        assert_eq!(stats.latest(), PopulationCount { rabbits: 1, foxes: 1 });
        assert_eq!(stats.history(), &[(4, PopulationCount { rabbits: 1, foxes: 1 })]);
        assert!(stats.is_viable(&FieldView::new(&field, &creatures)));

        field.clear(Location::new(1, 2));
        assert!(!stats.is_viable(&FieldView::new(&field, &creatures)));
    }

    #[test]
    fn test_population_display() {
        let counts = PopulationCount { rabbits: 12, foxes: 3 };
        assert_eq!(counts.to_string(), "Population: Rabbit: 12 Fox: 3");
        assert_eq!(counts.total(), 15);
    }

    #[test]
    fn test_palette_defaults_and_override() {
        let mut palette = Palette::default();
        assert_eq!(palette.token(Species::Rabbit).colour, Colour::Orange);
        assert_eq!(palette.token(Species::Fox).colour, Colour::Blue);

        palette.set_token(
            Species::Fox,
            Token {
                glyph: 'x',
                colour: Colour::Red,
            },
        );
        assert_eq!(palette.token(Species::Fox).glyph, 'x');
        assert_eq!(Palette::empty().token(Species::Rabbit), Token::UNKNOWN);
    }

    #[test]
    fn test_text_view_output() {
        let (field, creatures) = sample();
        let view = FieldView::new(&field, &creatures);
        let mut text = TextView::new(Vec::new(), 2);

        text.show_status(1, &view);
        text.show_status(2, &view);

        let output = String::from_utf8(text.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "Step: 1 Population: Rabbit: 1 Fox: 1");
        assert_eq!(lines[1], "Step: 2 Population: Rabbit: 1 Fox: 1");
        assert_eq!(lines[2], "R = Rabbit (orange), F = Fox (blue)");
        assert_eq!(lines[3], ".R.");
        assert_eq!(lines[4], "..F");
    }
}
