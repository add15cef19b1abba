use std::path::{Path, PathBuf};

use crossterm::event::{Event, KeyCode};
use labelmatch_core::{DistributionMatcher, InvalidInput, LabelAllocation, LabeledTable, SampledTable};
use labelmatch_stats::share::LabelShare;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Cell, Row, Table, Widget},
};

use crate::{schema::report, tui::App, util::Output};

/// Side-by-side view of the training and matched distributions.
#[derive(Debug)]
pub struct MatchViewApp {
    reference: LabeledTable,
    candidate: LabeledTable,
    matcher: DistributionMatcher,
    output: PathBuf,
    reference_shares: Vec<LabelShare>,
    sampled: SampledTable,
    matched_shares: Vec<LabelShare>,
    status: Option<Status>,
    last_saved: Option<PathBuf>,
    should_exit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Status {
    Info(String),
    Error(String),
}

impl MatchViewApp {
    pub fn new(
        reference: LabeledTable,
        candidate: LabeledTable,
        label_column: &str,
        seed: u64,
        output: PathBuf,
    ) -> Result<Self, InvalidInput> {
        let matcher = DistributionMatcher::new(label_column).with_seed(seed);
        let reference_shares = matcher.compute_distribution(&reference)?.shares();
        let sampled = matcher.match_distribution(&reference, &candidate)?;
        let matched_shares = Self::shares_of(&sampled, label_column);
        Ok(Self {
            reference,
            candidate,
            matcher,
            output,
            reference_shares,
            sampled,
            matched_shares,
            status: None,
            last_saved: None,
            should_exit: false,
        })
    }

    fn shares_of(sampled: &SampledTable, label_column: &str) -> Vec<LabelShare> {
        report::matched_distribution(sampled, label_column)
            .map(|dist| dist.shares_by_frequency())
            .unwrap_or_default()
    }

    pub fn seed(&self) -> u64 {
        self.matcher.seed()
    }

    pub fn last_saved(&self) -> Option<&Path> {
        self.last_saved.as_deref()
    }

    fn rematch(&mut self, seed: u64) {
        let matcher = self.matcher.clone().with_seed(seed);
        match matcher.match_distribution(&self.reference, &self.candidate) {
            Ok(sampled) => {
                self.matched_shares = Self::shares_of(&sampled, matcher.label_column());
                self.sampled = sampled;
                self.matcher = matcher;
                self.status = Some(Status::Info(format!(
                    "Resampled with seed {seed}: {} rows",
                    self.sampled.len()
                )));
            }
            Err(e) => self.status = Some(Status::Error(e.to_string())),
        }
    }

    fn save(&mut self) {
        let result = Output::open(self.output.clone())
            .and_then(|mut output| output.write_csv(self.sampled.table()));
        match result {
            Ok(()) => {
                self.status = Some(Status::Info(format!(
                    "Saved {} rows to {}",
                    self.sampled.len(),
                    self.output.display()
                )));
                self.last_saved = Some(self.output.clone());
            }
            Err(e) => self.status = Some(Status::Error(format!("{e:#}"))),
        }
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
            KeyCode::Char('n') | KeyCode::Right => self.rematch(self.seed().wrapping_add(1)),
            KeyCode::Char('p') | KeyCode::Left => self.rematch(self.seed().wrapping_sub(1)),
            KeyCode::Char('s') => self.save(),
            _ => {}
        }
    }
}

impl App for MatchViewApp {
    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn handle_event(&mut self, event: &Event) {
        if let Some(event) = event.as_key_event() {
            self.handle_key(event.code);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let [title_area, main_area, allocation_area, status_area, help_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(frame.area());

        let [reference_pane, matched_pane] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(main_area);

        let title = Line::from(format!(
            "Match Data Distribution | label: {} | seed: {} | {} of {} testing rows",
            self.matcher.label_column(),
            self.seed(),
            self.sampled.len(),
            self.candidate.len()
        ))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .centered();
        frame.render_widget(title, title_area);

        frame.render_widget(
            ShareTable {
                title: "Training Data Distribution",
                shares: &self.reference_shares,
            },
            reference_pane,
        );
        frame.render_widget(
            ShareTable {
                title: "Matched Data Distribution",
                shares: &self.matched_shares,
            },
            matched_pane,
        );
        frame.render_widget(
            AllocationTable {
                allocations: self.sampled.allocations(),
            },
            allocation_area,
        );

        if let Some(status) = &self.status {
            let (text, color) = match status {
                Status::Info(text) => (text.as_str(), Color::Green),
                Status::Error(text) => (text.as_str(), Color::Red),
            };
            frame.render_widget(Line::from(text).style(Style::default().fg(color)), status_area);
        }

        let help_text = Text::from(format!(
            "n/p: Next/Prev Seed | s: Save to {} | q/Esc: Quit",
            self.output.display()
        ))
        .style(Style::default().fg(Color::DarkGray))
        .centered();
        frame.render_widget(help_text, help_area);
    }
}

struct ShareTable<'a> {
    title: &'a str,
    shares: &'a [LabelShare],
}

impl Widget for ShareTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let header = Row::new(["Label", "Share", "Rows"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows = self.shares.iter().map(|share| {
            Row::new([
                Cell::from(share.label.clone()),
                Cell::from(Text::from(share.formatted_percent()).right_aligned()),
                Cell::from(Text::from(share.count.to_string()).right_aligned()),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Fill(1),
                Constraint::Length(9),
                Constraint::Length(8),
            ],
        )
        .header(header)
        .block(Block::bordered().title(self.title));
        Widget::render(table, area, buf);
    }
}

struct AllocationTable<'a> {
    allocations: &'a [LabelAllocation],
}

impl Widget for AllocationTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let header = Row::new(["Label", "Target", "Available", "Sampled"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows = self.allocations.iter().map(|allocation| {
            let style = if allocation.is_capped() {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new([
                Cell::from(allocation.label.clone()),
                Cell::from(Text::from(allocation.target.to_string()).right_aligned()),
                Cell::from(Text::from(allocation.available.to_string()).right_aligned()),
                Cell::from(Text::from(allocation.sampled.to_string()).right_aligned()),
            ])
            .style(style)
        });
        let table = Table::new(
            rows,
            [
                Constraint::Fill(1),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .block(Block::bordered().title("Allocation (yellow: testing data ran short)"));
        Widget::render(table, area, buf);
    }
}
