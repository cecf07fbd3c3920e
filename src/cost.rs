//! Cost records produced by the attack models.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Flat cost record. `rop` is the primary scalar (ring operation count,
/// roughly CPU cycles); every comparison between costs orders by it alone.
/// Model-specific shape fields stay zero when a model does not populate
/// them. All magnitude fields may be `f64::INFINITY` for "out of reach".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cost {
    /// Ring operation count.
    pub rop: f64,
    /// Memory requirement in integers mod q.
    pub mem: f64,
    /// Number of LWE samples consumed.
    pub m: f64,
    /// Independent repetitions scaled in via [`Cost::repeat`].
    pub repetitions: u64,
    /// BKW table size exponent (tables hold `q^b` entries).
    pub b: u32,
    /// Plain BKW steps.
    pub t1: u32,
    /// Coded BKW steps.
    pub t2: u32,
    /// Hypothesis-testing table exponent.
    pub ell: u32,
    /// Coordinates consumed by coding steps.
    pub ncod: u32,
    /// Coordinates consumed by guessing steps.
    pub ntop: u32,
    /// Coordinates hypothesis-tested.
    pub ntest: u32,
    /// MITM splitting dimension.
    pub k: u32,
    pub tag: String,
}

impl Cost {
    /// Scales the runtime-like quantities (`rop`, `m`) for `times`
    /// independent repetitions of the attack. Memory is reused across
    /// repetitions and does not scale.
    pub fn repeat(mut self, times: f64) -> Self {
        self.rop *= times;
        self.m *= times;
        self.repetitions = times as u64;
        self
    }
}

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.rop == other.rop
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.rop.partial_cmp(&other.rop)
    }
}

/// Renders a magnitude as `≈2^x` with one decimal. Values up to 2048 stay
/// plain (integers undecorated), unreachable costs render as `∞`.
pub fn fmt_magnitude(v: f64) -> String {
    if v.is_infinite() {
        return "∞".to_string();
    }
    if v > 2048.0 {
        return format!("≈2^{:.1}", v.log2());
    }
    if v == v.trunc() {
        format!("{v:.0}")
    } else {
        format!("{v:.3}")
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        for (name, v) in [("rop", self.rop), ("mem", self.mem), ("m", self.m)] {
            if v != 0.0 {
                parts.push(format!("{}: {}", name, fmt_magnitude(v)));
            }
        }
        if self.b != 0 {
            for (name, v) in [
                ("b", self.b),
                ("t1", self.t1),
                ("t2", self.t2),
                ("ℓ", self.ell),
                ("#cod", self.ncod),
                ("#top", self.ntop),
                ("#test", self.ntest),
            ] {
                parts.push(format!("{name}: {v}"));
            }
        }
        if self.k != 0 {
            parts.push(format!("k: {}", self.k));
        }
        if self.repetitions > 0 {
            parts.push(format!("↻: {}", self.repetitions));
        }
        if !self.tag.is_empty() {
            parts.push(format!("tag: {}", self.tag));
        }
        write!(f, "{}", parts.join(", "))
    }
}
