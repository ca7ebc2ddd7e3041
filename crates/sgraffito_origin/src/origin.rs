use std::fmt;

use compact_str::CompactString;
use smallvec::SmallVec;

/// One step of a property access path recorded against a binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSeg {
    Key(CompactString),
    /// A computed access whose key could not be determined statically.
    Wildcard,
}

pub type AccessPath = SmallVec<[PathSeg; 4]>;

/// The flavor of reactive wrapper a value came from. The flavor never
/// changes which diagnostics fire, but it is carried through so reports
/// can name the producing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    Plain,
    Computed,
    Derived,
    Custom,
    Shallow,
    Model,
}

impl RefKind {
    pub fn producer(self) -> &'static str {
        match self {
            Self::Plain => "ref",
            Self::Computed => "computed",
            Self::Derived => "toRef",
            Self::Custom => "customRef",
            Self::Shallow => "shallowRef",
            Self::Model => "defineModel",
        }
    }
}

/// Where a value ultimately came from. Resolution is conservative:
/// anything the analysis cannot pin down is `Unknown`, and `Unknown`
/// never triggers a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Nothing could be proven about the value.
    Unknown,
    /// A reactive wrapper object that must be unwrapped through
    /// `.value` before its payload is usable.
    Ref { kind: RefKind },
    /// A component prop, or a projection into the props object. An
    /// empty path with `wildcard` set is the whole props object; a
    /// non-empty path names one declared prop (plus any deeper keys).
    Prop { path: AccessPath, wildcard: bool },
    /// The component instance (`this` or a captured alias), optionally
    /// projected through member accesses.
    SelfRef { path: AccessPath },
    /// A literal or literal-built value.
    Literal,
    /// A value that is definitely not interesting to any rule: a call
    /// result, an import, an unwrapped `.value` payload.
    Opaque,
    /// A binding written from several places with differing origins.
    Union(Vec<Origin>),
}

impl Origin {
    pub fn prop_root() -> Self {
        Origin::Prop {
            path: AccessPath::new(),
            wildcard: true,
        }
    }

    pub fn prop_named(name: &str) -> Self {
        let mut path = AccessPath::new();
        path.push(PathSeg::Key(CompactString::new(name)));
        Origin::Prop {
            path,
            wildcard: false,
        }
    }

    pub fn self_root() -> Self {
        Origin::SelfRef {
            path: AccessPath::new(),
        }
    }

    /// True when this origin, or any variant of a union, is a reactive
    /// wrapper. Rules that guard against using a wrapper where its
    /// payload is expected fire on possibility, not certainty.
    pub fn may_be_ref(&self) -> bool {
        match self {
            Origin::Ref { .. } => true,
            Origin::Union(variants) => variants.iter().any(Origin::may_be_ref),
            _ => false,
        }
    }

    /// The wrapper flavor, when [`may_be_ref`](Self::may_be_ref) holds.
    pub fn ref_kind(&self) -> Option<RefKind> {
        match self {
            Origin::Ref { kind } => Some(*kind),
            Origin::Union(variants) => variants.iter().find_map(Origin::ref_kind),
            _ => None,
        }
    }

    /// True when every variant is a prop projection. Mutation rules
    /// require certainty before reporting.
    pub fn is_definitely_prop(&self) -> bool {
        match self {
            Origin::Prop { .. } => true,
            Origin::Union(variants) => {
                !variants.is_empty() && variants.iter().all(Origin::is_definitely_prop)
            }
            _ => false,
        }
    }

    pub fn as_prop(&self) -> Option<(&AccessPath, bool)> {
        match self {
            Origin::Prop { path, wildcard } => Some((path, *wildcard)),
            Origin::Union(variants) => variants.iter().find_map(Origin::as_prop),
            _ => None,
        }
    }

    pub fn as_self_path(&self) -> Option<&AccessPath> {
        match self {
            Origin::SelfRef { path } => Some(path),
            Origin::Union(variants) => variants.iter().find_map(Origin::as_self_path),
            _ => None,
        }
    }

    /// Collapse a set of per-write origins into one descriptor.
    /// Duplicates are dropped; a single survivor is returned bare.
    pub fn union_of(origins: Vec<Origin>) -> Origin {
        let mut flat: Vec<Origin> = Vec::with_capacity(origins.len());
        for origin in origins {
            match origin {
                Origin::Union(inner) => {
                    for o in inner {
                        if !flat.contains(&o) {
                            flat.push(o);
                        }
                    }
                }
                other => {
                    if !flat.contains(&other) {
                        flat.push(other);
                    }
                }
            }
        }
        match flat.len() {
            0 => Origin::Unknown,
            1 => flat.pop().unwrap_or(Origin::Unknown),
            _ => Origin::Union(flat),
        }
    }

    /// Extend the origin through one member access. `key` is `None`
    /// for computed accesses with a non-literal key.
    pub fn member(self, key: Option<&str>) -> Origin {
        match self {
            Origin::Prop { mut path, wildcard } => {
                match key {
                    Some(k) => path.push(PathSeg::Key(CompactString::new(k))),
                    None => path.push(PathSeg::Wildcard),
                }
                Origin::Prop { path, wildcard }
            }
            Origin::SelfRef { mut path } => {
                match key {
                    Some(k) => path.push(PathSeg::Key(CompactString::new(k))),
                    None => path.push(PathSeg::Wildcard),
                }
                Origin::SelfRef { path }
            }
            // Unwrapping a reactive wrapper yields its payload, about
            // which nothing further is known.
            Origin::Ref { .. } if key == Some("value") => Origin::Opaque,
            Origin::Ref { .. } => Origin::Unknown,
            Origin::Union(variants) => {
                Origin::union_of(variants.into_iter().map(|o| o.member(key)).collect())
            }
            Origin::Unknown | Origin::Literal | Origin::Opaque => Origin::Unknown,
        }
    }
}

/// Renders an access path for report text: `["a", Wildcard]` becomes
/// `a.[computed]`. An empty path renders as the given root label.
pub fn render_path(path: &[PathSeg], root: &str) -> CompactString {
    if path.is_empty() {
        return CompactString::new(root);
    }
    let mut out = CompactString::new("");
    for (i, seg) in path.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        match seg {
            PathSeg::Key(key) => out.push_str(key),
            PathSeg::Wildcard => out.push_str("[computed]"),
        }
    }
    out
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Unknown => f.write_str("unknown"),
            Origin::Ref { kind } => write!(f, "ref({})", kind.producer()),
            Origin::Prop { path, .. } => write!(f, "prop({})", render_path(path, "props")),
            Origin::SelfRef { path } => write!(f, "instance({})", render_path(path, "this")),
            Origin::Literal => f.write_str("literal"),
            Origin::Opaque => f.write_str("opaque"),
            Origin::Union(variants) => {
                f.write_str("union(")?;
                for (i, v) in variants.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_deduplicates_and_collapses_singletons() {
        let u = Origin::union_of(vec![Origin::Literal, Origin::Literal]);
        assert_eq!(u, Origin::Literal);

        let u = Origin::union_of(vec![
            Origin::Literal,
            Origin::Ref { kind: RefKind::Plain },
            Origin::Literal,
        ]);
        assert!(matches!(&u, Origin::Union(v) if v.len() == 2));
        assert!(u.may_be_ref());
    }

    #[test]
    fn mixed_union_is_not_definitely_prop() {
        let u = Origin::union_of(vec![Origin::prop_named("count"), Origin::Literal]);
        assert!(!u.is_definitely_prop());

        let u = Origin::union_of(vec![Origin::prop_named("a"), Origin::prop_named("b")]);
        assert!(u.is_definitely_prop());
    }

    #[test]
    fn member_access_extends_prop_paths() {
        let origin = Origin::prop_root().member(Some("user")).member(None);
        let (path, wildcard) = origin.as_prop().unwrap();
        assert!(wildcard);
        assert_eq!(render_path(path, "props"), "user.[computed]");
    }

    #[test]
    fn value_access_on_ref_is_opaque() {
        let origin = Origin::Ref { kind: RefKind::Computed }.member(Some("value"));
        assert_eq!(origin, Origin::Opaque);
        assert!(!origin.may_be_ref());
    }
}
