use std::io::{self, Write};

use crate::bitboard::CellMask;
use crate::common::{ShotOutcome, Side};
use crate::config::{unit_spec, BOARD_SIZE};
use crate::coord::{self, Coord};
use crate::protocol::{Event, PlacementRequest, ShotRequest, TargetRequest, Verdict};
use crate::unit::Orientation;

use super::Player;

/// Interactive terminal player.
///
/// Keeps a local picture of its own grid from the events it receives so
/// that both boards can be shown before every decision.
#[derive(Default)]
pub struct CliPlayer {
    side: Option<Side>,
    own: CellMask,
    incoming_hits: CellMask,
    incoming_misses: CellMask,
}

impl CliPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn print_own_board(&self) {
        print_header();
        for r in 0..BOARD_SIZE {
            print!("{} ", (b'A' + r as u8) as char);
            for c in 0..BOARD_SIZE {
                let cell = Coord::unchecked(r as u8, c as u8);
                let ch = if self.incoming_hits.contains(cell) {
                    'X'
                } else if self.incoming_misses.contains(cell) {
                    'o'
                } else if self.own.contains(cell) {
                    '#'
                } else {
                    '.'
                };
                print!("  {}", ch);
            }
            println!();
        }
    }

    fn record(&mut self, event: &Event) {
        match event {
            Event::UnitPlaced { unit, cells } => {
                self.own |= cells.iter().copied().collect::<CellMask>();
                println!("{} placed at {}", unit, coord::format_list(cells));
            }
            Event::BattleStarted { side, opening } => {
                self.side = Some(*side);
                println!("\nBattle started. You are side {}, side {} opens.", side, opening);
            }
            Event::ShotFired { shooter, kind } => {
                println!("Side {} fires {}", shooter, kind);
            }
            Event::ShotResolved {
                shooter,
                coord,
                outcome,
            } => {
                if Some(*shooter) != self.side {
                    match outcome {
                        ShotOutcome::Miss => self.incoming_misses.insert(*coord),
                        _ => self.incoming_hits.insert(*coord),
                    };
                }
                let what = match outcome {
                    ShotOutcome::Miss => "miss".to_string(),
                    ShotOutcome::Hit => "hit".to_string(),
                    ShotOutcome::Destroyed { unit, .. } => format!("hit, {} destroyed", unit),
                };
                println!("  {} -> {}", coord, what);
            }
            Event::TargetRejected { coord, .. } => {
                println!("  {} was already resolved and is skipped", coord);
            }
            Event::TurnChanged { active } => {
                if Some(*active) == self.side {
                    println!("\nYour turn.");
                } else {
                    println!("\nWaiting for side {}...", active);
                }
            }
            Event::MatchFinished { verdict, .. } => match verdict {
                Verdict::Won => println!("\nYou won!"),
                Verdict::Lost => println!("\nYou lost."),
                Verdict::Aborted => println!("\nOpponent disconnected, match aborted."),
            },
        }
    }
}

fn print_header() {
    print!(" ");
    for c in 1..=BOARD_SIZE {
        print!(" {:>2}", c);
    }
    println!();
}

fn print_view(request: &TargetRequest) {
    let view = &request.view;
    println!("Opponent board:");
    print_header();
    for r in 0..BOARD_SIZE {
        print!("{} ", (b'A' + r as u8) as char);
        for c in 0..BOARD_SIZE {
            let cell = Coord::unchecked(r as u8, c as u8);
            let ch = if view.destroyed.contains(&cell) {
                '*'
            } else if view.hits.contains(&cell) {
                'X'
            } else if view.misses.contains(&cell) {
                'o'
            } else {
                '.'
            };
            print!("  {}", ch);
        }
        println!();
    }
}

/// Read one line from stdin without blocking the runtime.
async fn read_line(prompt: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || {
        print!("{}", prompt);
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Err(anyhow::anyhow!("stdin closed"));
        }
        Ok(line.trim().to_string())
    })
    .await?
}

/// Parse either `<origin> <h|v>` or an explicit `;`-separated cell list.
fn parse_placement(unit: &str, input: &str) -> Result<Vec<Coord>, String> {
    let mut parts = input.split_whitespace();
    if let (Some(origin), Some(dir), None) = (parts.next(), parts.next(), parts.next()) {
        let orientation = match dir.to_ascii_lowercase().as_str() {
            "h" => Orientation::Horizontal,
            "v" => Orientation::Vertical,
            other => return Err(format!("Unknown orientation '{}', use h or v", other)),
        };
        let origin: Coord = origin.parse().map_err(|e| format!("{}", e))?;
        let spec = unit_spec(unit).ok_or_else(|| format!("Unknown unit {}", unit))?;
        return spec.footprint(origin, orientation).map_err(|e| e.to_string());
    }
    coord::parse_list(input).map_err(|e| e.to_string())
}

#[async_trait::async_trait]
impl Player for CliPlayer {
    async fn place_unit(&mut self, request: &PlacementRequest) -> anyhow::Result<Vec<Coord>> {
        self.print_own_board();
        if let Some(notice) = &request.notice {
            println!("Rejected: {}", notice);
        }
        let (rows, cols) = request.shape;
        loop {
            let line = read_line(format!(
                "Place {} ({}x{}), e.g. 'B2 h' or 'B2;B3': ",
                request.unit, rows, cols
            ))
            .await?;
            match parse_placement(&request.unit, &line) {
                Ok(cells) => return Ok(cells),
                Err(e) => println!("{}", e),
            }
        }
    }

    async fn choose_shot(&mut self, request: &ShotRequest) -> anyhow::Result<String> {
        println!("\nYour board:");
        self.print_own_board();
        if let Some(notice) = &request.notice {
            println!("Rejected: {}", notice);
        }
        let options: Vec<String> = request.available.iter().map(|k| k.to_string()).collect();
        read_line(format!("Choose a shot [{}]: ", options.join(", "))).await
    }

    async fn choose_targets(&mut self, request: &TargetRequest) -> anyhow::Result<Vec<Coord>> {
        print_view(request);
        if let Some(notice) = &request.notice {
            println!("Rejected: {}", notice);
        }
        loop {
            let line = read_line(format!(
                "Targets for {} ({} to {}, separated by ';'): ",
                request.kind, request.min, request.max
            ))
            .await?;
            match coord::parse_list(&line) {
                Ok(cells) => return Ok(cells),
                Err(e) => println!("{}", e),
            }
        }
    }

    async fn notify(&mut self, event: &Event) -> anyhow::Result<()> {
        self.record(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_accepts_origin_and_orientation() {
        let cells = parse_placement("Tank", "b2 v").unwrap();
        assert_eq!(coord::format_list(&cells), "B2;C2");
    }

    #[test]
    fn placement_accepts_cell_list() {
        let cells = parse_placement("Tank", "B2;B3").unwrap();
        assert_eq!(cells.len(), 2);
    }

    #[test]
    fn placement_rejects_unknown_orientation() {
        assert!(parse_placement("Tank", "B2 x").is_err());
    }
}
