//! Stylesheet for krown-auth terminal output.

use owo_colors::Style;

/// Styles for each kind of line the prepare command prints. All plain
/// until [`Styles::colorize`] is called.
#[derive(Default, Clone)]
pub struct Styles {
    /// `✓` marks and the final ready lines.
    pub success: Style,
    /// `⚠` marks, e.g. a fallback to RSA.
    pub warning: Style,
    /// `✗` marks on stderr.
    pub error: Style,
    /// Labels such as `Public key path:` and remediation hints.
    pub dim: Style,
    /// The banner and the public key heading.
    pub header: Style,
    /// Filesystem paths of the key files.
    pub path: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red().bold();
        self.dim = Style::new().dimmed();
        self.header = Style::new().bold();
        self.path = Style::new().cyan();
    }
}
