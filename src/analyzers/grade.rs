use std::fmt;
use std::str::FromStr;

/// A letter grade on the 13-point scale, ordered worst to best.
///
/// | Grade | Value |
/// |-------|-------|
/// | G     | 0     |
/// | D-    | 1     |
/// | D     | 2     |
/// | D+    | 3     |
/// | C-    | 4     |
/// | C     | 5     |
/// | C+    | 6     |
/// | B-    | 7     |
/// | B     | 8     |
/// | B+    | 9     |
/// | A-    | 10    |
/// | A     | 11    |
/// | A+    | 12    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LetterGrade {
    G,
    DMinus,
    D,
    DPlus,
    CMinus,
    C,
    CPlus,
    BMinus,
    B,
    BPlus,
    AMinus,
    A,
    APlus,
}

impl LetterGrade {
    pub const ALL: [LetterGrade; 13] = [
        LetterGrade::G,
        LetterGrade::DMinus,
        LetterGrade::D,
        LetterGrade::DPlus,
        LetterGrade::CMinus,
        LetterGrade::C,
        LetterGrade::CPlus,
        LetterGrade::BMinus,
        LetterGrade::B,
        LetterGrade::BPlus,
        LetterGrade::AMinus,
        LetterGrade::A,
        LetterGrade::APlus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LetterGrade::G => "G",
            LetterGrade::DMinus => "D-",
            LetterGrade::D => "D",
            LetterGrade::DPlus => "D+",
            LetterGrade::CMinus => "C-",
            LetterGrade::C => "C",
            LetterGrade::CPlus => "C+",
            LetterGrade::BMinus => "B-",
            LetterGrade::B => "B",
            LetterGrade::BPlus => "B+",
            LetterGrade::AMinus => "A-",
            LetterGrade::A => "A",
            LetterGrade::APlus => "A+",
        }
    }

    pub fn value(self) -> f64 {
        self as u8 as f64
    }
}

impl FromStr for LetterGrade {
    type Err = ();

    /// Matches the exact grade text; anything else is off the scale.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LetterGrade::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric value of a letter grade, or `None` when the text is not on the scale.
pub fn numeric(letter: &str) -> Option<f64> {
    letter.parse::<LetterGrade>().ok().map(LetterGrade::value)
}
