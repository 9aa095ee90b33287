use super::policy::ResolverPolicy;
use indexmap::{IndexMap, IndexSet};
use liteworkspace_api::models::{
    DeclId, DeclKind, Declaration, InclusionPolicy, LibraryCoordinate, ReferenceKind, SourceScope,
};
use liteworkspace_api::{ApiError, ApiResult, SymbolGraph};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// A declaration admitted to the closure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionNode {
    pub declaration: Arc<Declaration>,
    pub policy: InclusionPolicy,
    /// Length of the shortest reference path from the root.
    pub distance: usize,
}

/// Non-fatal observations made while computing a closure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    UnresolvedReference { from: DeclId, name: String },
    LibraryExpansionSkipped { library: LibraryCoordinate },
    DepthLimitReached { from: DeclId, to: DeclId },
    TestScopeExcluded { from: DeclId, to: DeclId },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedReference { from, name } => {
                write!(f, "unresolved reference `{}` from `{}`", name, from)
            }
            Diagnostic::LibraryExpansionSkipped { library } => {
                write!(f, "library `{}` is referenced, not expanded", library)
            }
            Diagnostic::DepthLimitReached { from, to } => {
                write!(f, "depth limit cuts `{}` -> `{}`", from, to)
            }
            Diagnostic::TestScopeExcluded { from, to } => {
                write!(f, "test-scope `{}` excluded (referenced from `{}`)", to, from)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosureResult {
    pub root: DeclId,
    /// Admitted declarations in discovery order; the root comes first.
    pub nodes: IndexMap<DeclId, ResolutionNode>,
    /// Distinct library coordinates in first-appearance order.
    pub libraries: Vec<LibraryCoordinate>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ClosureResult {
    pub fn get(&self, id: &str) -> Option<&ResolutionNode> {
        self.nodes.get(id)
    }

    pub fn count(&self, policy: InclusionPolicy) -> usize {
        self.nodes.values().filter(|n| n.policy == policy).count()
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::UnresolvedReference { .. }))
    }
}

/// Breadth-first closure over the references of a symbol graph.
///
/// Holds no state between calls; one resolver can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ClosureResolver {
    policy: ResolverPolicy,
}

struct Traversal {
    nodes: IndexMap<DeclId, (Arc<Declaration>, usize)>,
    incoming: HashMap<DeclId, BTreeSet<ReferenceKind>>,
    /// Constructors kept only so their trimmed type compiles.
    companions: HashSet<DeclId>,
    libraries: IndexSet<LibraryCoordinate>,
    diagnostics: IndexSet<Diagnostic>,
    queue: VecDeque<DeclId>,
}

impl Traversal {
    fn admit(&mut self, decl: Arc<Declaration>, distance: usize) {
        let id = decl.id.clone();
        if let Some(coordinate) = decl.origin.coordinate() {
            if self.libraries.insert(coordinate.clone()) {
                self.diagnostics.insert(Diagnostic::LibraryExpansionSkipped {
                    library: coordinate.clone(),
                });
            }
        } else {
            self.queue.push_back(id.clone());
        }
        self.nodes.insert(id, (decl, distance));
    }
}

impl ClosureResolver {
    pub fn new(policy: ResolverPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ResolverPolicy {
        &self.policy
    }

    /// Compute the closure of `root`. Fails only when the root itself is unknown.
    pub fn resolve(&self, graph: &dyn SymbolGraph, root: &str) -> ApiResult<ClosureResult> {
        let start = Instant::now();
        let root_decl = graph.resolve(root)?;
        if root_decl.is_library() {
            return Err(ApiError::InvalidArgument(format!(
                "{} is a library declaration and has no source",
                root
            )));
        }
        let root_id = root_decl.id.clone();

        let mut state = Traversal {
            nodes: IndexMap::new(),
            incoming: HashMap::new(),
            companions: HashSet::new(),
            libraries: IndexSet::new(),
            diagnostics: IndexSet::new(),
            queue: VecDeque::new(),
        };
        state.admit(root_decl, 0);

        loop {
            self.expand(graph, &mut state);
            let companions = self.constructor_companions(graph, &state, &root_id);
            if companions.is_empty() {
                break;
            }
            for (decl, distance) in companions {
                debug!("Keeping {} so its type still compiles", decl.id);
                state.companions.insert(decl.id.clone());
                state.admit(decl, distance);
            }
        }

        let nodes: IndexMap<DeclId, ResolutionNode> = state
            .nodes
            .iter()
            .map(|(id, (declaration, distance))| {
                let policy = self.policy_of(&state, declaration, &root_id);
                (
                    id.clone(),
                    ResolutionNode {
                        declaration: declaration.clone(),
                        policy,
                        distance: *distance,
                    },
                )
            })
            .collect();

        let result = ClosureResult {
            root: root_id,
            nodes,
            libraries: state.libraries.into_iter().collect(),
            diagnostics: state.diagnostics.into_iter().collect(),
        };
        info!(
            "Closure of {}: {} full, {} stub, {} external, {} diagnostics in {:?}",
            result.root,
            result.count(InclusionPolicy::FullSource),
            result.count(InclusionPolicy::Stub),
            result.count(InclusionPolicy::ExternalReferenceOnly),
            result.diagnostics.len(),
            start.elapsed()
        );
        Ok(result)
    }

    /// Breadth-first expansion of everything queued.
    fn expand(&self, graph: &dyn SymbolGraph, state: &mut Traversal) {
        while let Some(id) = state.queue.pop_front() {
            let distance = state.nodes.get(&id).map(|(_, d)| *d).unwrap_or(0);
            let references = graph.direct_references(&id);
            debug!("Expanding {} at distance {} ({} references)", id, distance, references.len());

            for reference in references {
                let Some(target) = reference.target else {
                    state.diagnostics.insert(Diagnostic::UnresolvedReference {
                        from: id.clone(),
                        name: reference.name,
                    });
                    continue;
                };
                if target == id {
                    continue;
                }
                if state.nodes.contains_key(&target) {
                    state.incoming.entry(target).or_default().insert(reference.kind);
                    continue;
                }

                let decl = match graph.resolve(target.as_str()) {
                    Ok(decl) => decl,
                    Err(_) => {
                        state.diagnostics.insert(Diagnostic::UnresolvedReference {
                            from: id.clone(),
                            name: reference.name,
                        });
                        continue;
                    }
                };

                if !decl.is_library() {
                    if decl.scope == SourceScope::Test && !self.policy.include_test_scope {
                        state.diagnostics.insert(Diagnostic::TestScopeExcluded {
                            from: id.clone(),
                            to: target,
                        });
                        continue;
                    }
                    if self.policy.max_depth.is_some_and(|max| distance >= max) {
                        state.diagnostics.insert(Diagnostic::DepthLimitReached {
                            from: id.clone(),
                            to: target,
                        });
                        continue;
                    }
                }

                state.incoming.entry(target).or_default().insert(reference.kind);
                state.admit(decl, distance + 1);
            }
        }
    }

    /// Constructors that trimmed types cannot compile without.
    ///
    /// A type that is not kept whole loses the constructors nobody calls. That
    /// breaks it when a kept blank `final` field is assigned there, when its
    /// enum constants pass arguments, or when a constructor chains to
    /// `super(...)`/`this(...)`. Such constructors come back as stubs, one
    /// step behind the nearest kept member.
    fn constructor_companions(
        &self,
        graph: &dyn SymbolGraph,
        state: &Traversal,
        root: &DeclId,
    ) -> Vec<(Arc<Declaration>, usize)> {
        let mut owners: IndexMap<DeclId, usize> = IndexMap::new();
        for (id, (decl, distance)) in &state.nodes {
            if decl.is_library() {
                continue;
            }
            let owner = if decl.kind.is_type() {
                Some(id.clone())
            } else {
                decl.parent.clone()
            };
            if let Some(owner) = owner {
                let nearest = owners.entry(owner).or_insert(*distance);
                *nearest = (*nearest).min(*distance);
            }
        }

        let mut companions = Vec::new();
        for (owner, distance) in owners {
            let kept_whole = state.nodes.get(&owner).is_some_and(|(decl, _)| {
                self.policy_of(state, decl, root) == InclusionPolicy::FullSource
            });
            if kept_whole {
                continue;
            }
            let Ok(owner_decl) = graph.resolve(owner.as_str()) else {
                continue;
            };
            let members = graph.children(&owner);
            let missing: Vec<&Arc<Declaration>> = members
                .iter()
                .filter(|m| m.kind == DeclKind::Constructor && !state.nodes.contains_key(&m.id))
                .collect();
            if missing.is_empty() || !needs_constructors(&owner_decl, &members, state) {
                continue;
            }
            companions.extend(missing.into_iter().map(|c| (c.clone(), distance + 1)));
        }
        companions
    }

    fn policy_of(&self, state: &Traversal, decl: &Declaration, root: &DeclId) -> InclusionPolicy {
        if decl.is_library() {
            InclusionPolicy::ExternalReferenceOnly
        } else if decl.id == *root {
            InclusionPolicy::FullSource
        } else {
            match state.incoming.get(&decl.id).filter(|k| !k.is_empty()) {
                None if state.companions.contains(&decl.id) => InclusionPolicy::Stub,
                kinds => self.policy_for(kinds),
            }
        }
    }

    fn policy_for(&self, kinds: Option<&BTreeSet<ReferenceKind>>) -> InclusionPolicy {
        match kinds.filter(|k| !k.is_empty()) {
            Some(kinds) => kinds
                .iter()
                .map(|kind| self.policy_for_kind(*kind))
                .fold(InclusionPolicy::Stub, InclusionPolicy::dominant),
            None => InclusionPolicy::FullSource,
        }
    }

    fn policy_for_kind(&self, kind: ReferenceKind) -> InclusionPolicy {
        if !kind.requires_full_source() && self.policy.stub_kinds.contains(&kind) {
            InclusionPolicy::Stub
        } else {
            InclusionPolicy::FullSource
        }
    }
}

fn needs_constructors(owner: &Declaration, members: &[Arc<Declaration>], state: &Traversal) -> bool {
    if owner.kind == DeclKind::Enum {
        return true;
    }
    members.iter().any(|member| match (member.kind, member.shape()) {
        (DeclKind::Constructor, Some(shape)) => std::iter::once(shape)
            .chain(&shape.overloads)
            .any(|s| s.constructor_call.is_some()),
        (DeclKind::Field, Some(shape)) => {
            state.nodes.contains_key(&member.id)
                && shape.is_blank_final()
                && !shape.has_modifier("static")
        }
        _ => false,
    })
}
