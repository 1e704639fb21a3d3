//! Math markup typesetting for the detail pane.
//!
//! Abstracts routinely contain inline TeX. Records are shown as literal markup until the
//! user asks for a record to be rendered; from then on the typesetter owns that record's
//! display and query highlighting is no longer applied to it.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Converts math markup into display text.
pub trait Typesetter: Send {
    fn typeset(&self, source: &str) -> String;
}

/// TeX-to-Unicode typesetter for terminal output.
///
/// Strips math delimiters and replaces common commands with their Unicode symbols.
/// Unknown commands are kept verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct TexTypesetter;

const DELIMITERS: &[&str] = &["$$", "$", r"\(", r"\)", r"\[", r"\]"];

const SYMBOLS: &[(&str, &str)] = &[
    ("alpha", "α"),
    ("beta", "β"),
    ("gamma", "γ"),
    ("delta", "δ"),
    ("epsilon", "ε"),
    ("varepsilon", "ε"),
    ("zeta", "ζ"),
    ("eta", "η"),
    ("theta", "θ"),
    ("kappa", "κ"),
    ("lambda", "λ"),
    ("mu", "μ"),
    ("nu", "ν"),
    ("xi", "ξ"),
    ("pi", "π"),
    ("rho", "ρ"),
    ("sigma", "σ"),
    ("tau", "τ"),
    ("phi", "φ"),
    ("chi", "χ"),
    ("psi", "ψ"),
    ("omega", "ω"),
    ("Gamma", "Γ"),
    ("Delta", "Δ"),
    ("Theta", "Θ"),
    ("Lambda", "Λ"),
    ("Sigma", "Σ"),
    ("Phi", "Φ"),
    ("Omega", "Ω"),
    ("infty", "∞"),
    ("leq", "≤"),
    ("le", "≤"),
    ("geq", "≥"),
    ("ge", "≥"),
    ("neq", "≠"),
    ("approx", "≈"),
    ("sim", "∼"),
    ("times", "×"),
    ("cdot", "·"),
    ("pm", "±"),
    ("in", "∈"),
    ("sum", "∑"),
    ("prod", "∏"),
    ("int", "∫"),
    ("partial", "∂"),
    ("nabla", "∇"),
    ("to", "→"),
    ("rightarrow", "→"),
    ("leftarrow", "←"),
    ("mathbb", ""),
    ("mathcal", ""),
    ("mathbf", ""),
    ("mathrm", ""),
    ("text", ""),
];

impl Typesetter for TexTypesetter {
    fn typeset(&self, source: &str) -> String {
        let mut output = String::with_capacity(source.len());
        let mut rest = source;

        'outer: while !rest.is_empty() {
            for delimiter in DELIMITERS {
                if let Some(after) = rest.strip_prefix(delimiter) {
                    rest = after;
                    continue 'outer;
                }
            }

            if let Some(after) = rest.strip_prefix('\\') {
                let name_len = after
                    .find(|c: char| !c.is_ascii_alphabetic())
                    .unwrap_or(after.len());
                let name = &after[..name_len];
                if let Some((_, symbol)) = SYMBOLS.iter().find(|(command, _)| *command == name) {
                    output.push_str(symbol);
                    rest = &after[name_len..];
                    continue;
                }
            }

            if rest.starts_with('{') || rest.starts_with('}') {
                rest = &rest[1..];
                continue;
            }

            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                output.push(c);
            }
            rest = chars.as_str();
        }

        output
    }
}

/// Memoizes typeset output per record id.
pub struct TypesetCache {
    typesetter: Box<dyn Typesetter>,
    entries: LruCache<String, Arc<str>>,
}

impl TypesetCache {
    pub fn new(typesetter: Box<dyn Typesetter>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            typesetter,
            entries: LruCache::new(capacity),
        }
    }

    /// Typeset `source` for `key`, reusing a previous result.
    pub fn render(&mut self, key: &str, source: &str) -> Arc<str> {
        if let Some(hit) = self.entries.get(key) {
            return Arc::clone(hit);
        }
        let rendered: Arc<str> = Arc::from(self.typesetter.typeset(source));
        self.entries.put(key.to_string(), Arc::clone(&rendered));
        rendered
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_inline_math() {
        let tex = TexTypesetter;
        assert_eq!(tex.typeset(r"rate $O(n^2)$"), "rate O(n^2)");
        assert_eq!(tex.typeset(r"$\alpha \leq \beta$"), "α ≤ β");
        assert_eq!(tex.typeset(r"\(\mathbb{R}^d\)"), "R^d");
        assert_eq!(tex.typeset(r"$$\sum_i x_i \to \infty$$"), "∑_i x_i → ∞");
    }

    #[test]
    fn test_plain_text_is_untouched() {
        let tex = TexTypesetter;
        assert_eq!(tex.typeset("Deep Nets, revisited"), "Deep Nets, revisited");
        assert_eq!(tex.typeset("Über"), "Über");
        assert_eq!(tex.typeset(r"trailing \"), r"trailing \");
    }

    struct CountingTypesetter(Arc<AtomicUsize>);

    impl Typesetter for CountingTypesetter {
        fn typeset(&self, source: &str) -> String {
            self.0.fetch_add(1, Ordering::SeqCst);
            source.to_uppercase()
        }
    }

    #[test]
    fn test_cache_reuses_results() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut cache = TypesetCache::new(Box::new(CountingTypesetter(Arc::clone(&calls))), 1);

        assert_eq!(&*cache.render("a", "x"), "X");
        assert_eq!(&*cache.render("a", "x"), "X");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.render("b", "y");
        cache.render("a", "x");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(cache.len(), 1);
    }
}
