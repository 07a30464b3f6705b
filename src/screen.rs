use crate::field::Field;

const ALIVE: char = '#';
const DEAD: char = ' ';
const ROW_END: char = '|';
const FOOTER: char = '=';

/// Renders a [`Field`] into a terminal frame.
///
/// One character per cell, a `|` terminating each row, and a `=` rule
/// closing the frame. The frame lives in an owned `String` that is sized
/// once and rebuilt on every render, so a tick loop allocates nothing.
pub struct Screen {
    /// The frame buffer
    fb: String,
}

impl Screen {
    pub fn new(field: &Field) -> Self {
        let (n, m) = (field.height(), field.width());

        // Each of the n rows is m cells, a terminator, and a newline; the
        // footer row is m + 2 more.
        let fb = String::with_capacity(n * (m + 2) + m + 2);

        Self { fb }
    }

    pub fn render(&mut self, field: &Field) -> &str {
        self.fb.clear();

        for x in 0..field.height() {
            for y in 0..field.width() {
                let alive = field.get(x as i64, y as i64);

                self.fb.push(if alive { ALIVE } else { DEAD });
            }

            self.fb.push(ROW_END);
            self.fb.push('\n');
        }

        for _ in 0..field.width() {
            self.fb.push(FOOTER);
        }
        self.fb.push(ROW_END);
        self.fb.push('\n');

        &self.fb
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::Screen;
    use crate::field::Field;

    #[test]
    fn renders_blinker_frame() {
        let mut field = Field::new(4, 5).unwrap();
        field.set(0, 1, true);
        field.set(1, 1, true);
        field.set(2, 1, true);

        let mut screen = Screen::new(&field);

        assert_snapshot!(screen.render(&field), @r"
         #   |
         #   |
         #   |
             |
        =====|
        ");
    }

    #[test]
    fn buffer_is_rebuilt_between_frames() {
        let mut field = Field::new(2, 2).unwrap();
        let mut screen = Screen::new(&field);

        field.set(0, 0, true);
        assert_eq!(screen.render(&field), "# |\n  |\n==|\n");

        field.set(0, 0, false);
        assert_eq!(screen.render(&field), "  |\n  |\n==|\n");
    }
}
