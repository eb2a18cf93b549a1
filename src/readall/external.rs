use std::io::{self, Write};

use crate::node::ExternalNode;

const FRAME: &str = "+------+---------+--------+";
const TITLES: &str = "|  Pin | Digital | Analog |";

/// Renders every pin of `node`.
///
/// The mode of an expander pin can't be determined, so each row only shows
/// the digital and analog readings.
pub(crate) fn render<W: Write>(out: &mut W, node: &dyn ExternalNode) -> io::Result<()> {
    writeln!(out, "{}", FRAME)?;
    writeln!(out, "{}", TITLES)?;
    writeln!(out, "{}", FRAME)?;

    for pin in node.pin_base()..=node.pin_max() {
        writeln!(
            out,
            "| {:>4} |  {:>4}   |  {:>4}  |",
            pin,
            node.digital_read(pin) as u8,
            node.analog_read(pin)
        )?;
    }

    writeln!(out, "{}", FRAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::readall::testing::FakeNode;

    #[test]
    fn one_row_per_pin() {
        let node = FakeNode::new(100, 103);

        let mut out = Vec::new();
        render(&mut out, &node).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], FRAME);
        assert_eq!(lines[1], TITLES);
        assert_eq!(lines[3], "|  100 |     0   |     0  |");
        assert_eq!(lines[4], "|  101 |     1   |    10  |");
        assert_eq!(lines[6], "|  103 |     1   |    30  |");
        assert_eq!(lines[7], FRAME);
    }

    #[test]
    fn single_pin_node() {
        let node = FakeNode::new(200, 200);

        let mut out = Vec::new();
        render(&mut out, &node).unwrap();

        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 5);
    }
}
