//! Minimal ESC/POS command builder for thermal receipt printers.
//!
//! Covers exactly what fiscal receipts need: alignment, emphasis, line
//! pairs, the model-2 QR command set (GS ( k), and paper cut. Output is a
//! raw byte stream for an 80 mm printer.

/// ESC/POS byte-stream builder.
pub struct TicketBuilder {
    buf: Vec<u8>,
    width: usize,
}

impl TicketBuilder {
    pub fn new(width: usize) -> Self {
        let mut buf = Vec::with_capacity(1024);
        // ESC @ - initialize
        buf.extend_from_slice(&[0x1B, 0x40]);
        Self { buf, width }
    }

    /// ESC a 1 - center alignment.
    pub fn center(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x01]);
        self
    }

    /// ESC a 0 - left alignment.
    pub fn left(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x00]);
        self
    }

    /// ESC E n - emphasis on/off.
    pub fn bold(&mut self, on: bool) -> &mut Self {
        self.buf
            .extend_from_slice(&[0x1B, 0x45, if on { 0x01 } else { 0x00 }]);
        self
    }

    /// One line of text followed by a line feed.
    pub fn line(&mut self, text: &str) -> &mut Self {
        self.buf.extend_from_slice(text.as_bytes());
        self.buf.push(b'\n');
        self
    }

    /// Left and right text on one line, padded apart to the full width.
    pub fn line_pair(&mut self, left: &str, right: &str) -> &mut Self {
        let used = left.chars().count() + right.chars().count();
        if used >= self.width {
            self.line(&format!("{left} {right}"))
        } else {
            self.line(&format!("{left}{}{right}", " ".repeat(self.width - used)))
        }
    }

    /// Full-width rule.
    pub fn separator(&mut self) -> &mut Self {
        let rule = "-".repeat(self.width);
        self.line(&rule)
    }

    /// Feed n blank lines.
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        // ESC d n
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    /// Print a model-2 QR code with error correction level L.
    ///
    /// `size` is the module size in dots (clamped to 1..=16).
    pub fn qr_code(&mut self, data: &str, size: u8) -> &mut Self {
        let size = size.clamp(1, 16);

        // Function 165: select model 2
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x04, 0x00, 0x31, 0x41, 0x32, 0x00]);
        // Function 167: module size
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, size]);
        // Function 169: error correction L
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x45, 0x30]);
        // Function 180: store data
        let payload = data.as_bytes();
        let len = payload.len() + 3;
        self.buf.extend_from_slice(&[
            0x1D,
            0x28,
            0x6B,
            (len & 0xFF) as u8,
            ((len >> 8) & 0xFF) as u8,
            0x31,
            0x50,
            0x30,
        ]);
        self.buf.extend_from_slice(payload);
        // Function 181: print
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x51, 0x30]);

        self
    }

    /// GS V 66 n - feed n lines and full-cut.
    pub fn cut(&mut self, feed: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, feed]);
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_init() {
        let b = TicketBuilder::new(42);
        let bytes = b.into_bytes();
        assert_eq!(&bytes[..2], &[0x1B, 0x40]);
    }

    #[test]
    fn line_pair_pads_to_width() {
        let mut b = TicketBuilder::new(20);
        b.line_pair("TOTAL", "9.99");
        let bytes = b.into_bytes();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("TOTAL           9.99\n"));
    }

    #[test]
    fn qr_command_embeds_payload() {
        let mut b = TicketBuilder::new(42);
        b.qr_code("P051234567X+312+SIG", 6);
        let bytes = b.into_bytes();
        // store-data function header
        assert!(bytes.windows(3).any(|w| w == [0x31, 0x50, 0x30]));
        let payload = b"P051234567X+312+SIG";
        assert!(
            bytes
                .windows(payload.len())
                .any(|w| w == payload.as_slice())
        );
    }

    #[test]
    fn cut_at_the_end() {
        let mut b = TicketBuilder::new(42);
        b.line("x").cut(4);
        let bytes = b.into_bytes();
        assert_eq!(&bytes[bytes.len() - 4..], &[0x1D, 0x56, 0x42, 4]);
    }
}
