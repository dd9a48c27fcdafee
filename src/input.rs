use crate::render::Viewport;
use cellular::Command;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::Duration;

/// What a key or mouse event asks for: a simulation command or a view change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Sim(Command),
    Zoom,
}

pub(crate) enum Input {
    Event(Event),
    Resize(u16, u16),
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<Input>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        match event::read()? {
            Event::Resize(c, r) => out.push(Input::Resize(c, r)),
            ev @ (Event::Key(_) | Event::Mouse(_)) => {
                out.push(Input::Event(ev));
                if out.len() >= 64 {
                    break;
                }
            }
            _ => {}
        }
    }
    Ok(out)
}

pub(crate) fn map_event(ev: &Event, vp: &Viewport) -> Vec<Action> {
    match ev {
        Event::Key(k) if k.kind == KeyEventKind::Press => match k.code {
            KeyCode::Char(' ') => vec![Action::Sim(Command::TogglePause)],
            KeyCode::Char('r') | KeyCode::Char('R') => vec![Action::Sim(Command::Randomize)],
            KeyCode::Char('c') | KeyCode::Char('C') => vec![Action::Sim(Command::Clear)],
            KeyCode::Char('z') | KeyCode::Char('Z') => vec![Action::Zoom],
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                vec![Action::Sim(Command::Quit)]
            }
            _ => Vec::new(),
        },
        Event::Mouse(m) => map_mouse(m, vp),
        _ => Vec::new(),
    }
}

fn map_mouse(m: &MouseEvent, vp: &Viewport) -> Vec<Action> {
    let alive = match m.kind {
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => true,
        MouseEventKind::Down(MouseButton::Right) | MouseEventKind::Drag(MouseButton::Right) => {
            false
        }
        _ => return Vec::new(),
    };
    vp.block_at(m.column, m.row)
        .into_iter()
        .map(|(x, y)| Action::Sim(Command::Paint { x, y, alive }))
        .collect()
}
