use core::fmt::Write as _;

use heapless::String;

use crate::domain::entity::Task;
use crate::domain::ports::{DisplaySurface, Ink, TextSize};

pub const IDLE_MESSAGE: &str = "No tasks";
pub const COMPLETION_MESSAGE: &str = "Task Done!";

const DUE_LINE_Y: i32 = 0;
const NAME_LINE_Y: i32 = 16;
const CATEGORY_LINE_Y: i32 = 32;

/// Horizontal positions of one animation sweep.
#[derive(Debug, Clone)]
pub struct Sweep {
    next: i32,
    end: i32,
    step: i32,
}

impl Sweep {
    /// Positions `start, start + step, ...` strictly below `end`.
    pub fn new(start: i32, end: i32, step: i32) -> Self {
        Self {
            next: start,
            end,
            step: step.max(1),
        }
    }
}

impl Iterator for Sweep {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.next >= self.end {
            return None;
        }
        let x = self.next;
        self.next += self.step;
        Some(x)
    }
}

/// Draws the device screens. Each call renders one complete frame and
/// presents it; the presenter keeps no state of its own.
pub struct Presenter<S: DisplaySurface> {
    surface: S,
}

impl<S: DisplaySurface> Presenter<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// Small text lines from the top-left corner.
    pub fn show_status(&mut self, lines: &[&str]) -> Result<(), S::Error> {
        self.begin_frame();
        self.surface.set_text_size(TextSize::Small);
        self.surface.set_cursor(0, 0);
        for line in lines {
            self.surface.println(line);
        }
        self.surface.present()
    }

    pub fn show_idle(&mut self) -> Result<(), S::Error> {
        self.begin_frame();
        self.surface.set_text_size(TextSize::Large);
        self.surface.set_cursor(0, NAME_LINE_Y);
        self.surface.println(IDLE_MESSAGE);
        self.surface.present()
    }

    pub fn show_due_date(&mut self, task: &Task) -> Result<(), S::Error> {
        self.begin_frame();
        self.draw_due_line(task);
        self.surface.present()
    }

    /// Screen shown after an animation and at boot.
    pub fn show_settled(&mut self, task: &Task, tasks_done: bool) -> Result<(), S::Error> {
        if tasks_done {
            self.show_idle()
        } else {
            self.show_due_date(task)
        }
    }

    /// One frame of the scrolling task screen with the name starting at `x`.
    pub fn draw_scroll_frame(&mut self, task: &Task, x: i32) -> Result<(), S::Error> {
        self.begin_frame();
        self.draw_due_line(task);

        self.surface.set_text_size(TextSize::Large);
        self.surface.set_cursor(x, NAME_LINE_Y);
        self.surface.println(&task.name);

        let mut category = String::<48>::new();
        let _ = write!(category, "Category: {}", task.category);
        self.surface.set_text_size(TextSize::Small);
        self.surface.set_cursor(0, CATEGORY_LINE_Y);
        self.surface.println(&category);

        self.surface.present()
    }

    /// One frame of the completion banner at `x`.
    pub fn draw_completion_frame(&mut self, x: i32) -> Result<(), S::Error> {
        self.begin_frame();
        self.surface.set_text_size(TextSize::Large);
        self.surface.set_cursor(x, NAME_LINE_Y);
        self.surface.println(COMPLETION_MESSAGE);
        self.surface.present()
    }

    /// The name enters from fully off-screen left and leaves fully right.
    pub fn scroll_sweep(&self, step: i32) -> Sweep {
        let width = self.surface.width();
        Sweep::new(-width, width, step)
    }

    /// The banner starts at the left edge and slides off to the right.
    pub fn completion_sweep(&self, step: i32) -> Sweep {
        Sweep::new(0, self.surface.width(), step)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn begin_frame(&mut self) {
        self.surface.clear();
        self.surface.set_ink(Ink::Foreground);
    }

    fn draw_due_line(&mut self, task: &Task) {
        let mut due = String::<32>::new();
        let _ = write!(due, "Due: {}", task.due_date);
        self.surface.set_text_size(TextSize::Small);
        self.surface.set_cursor(0, DUE_LINE_Y);
        self.surface.println(&due);
    }
}
