//! The plan cache.
//!
//! A [`Registry`] maps each [`Marshal`] type to its compiled [`Plan`]. Plans
//! are built lazily on first request, exactly once, and are never evicted.
//!
//! ## Building
//!
//! Construction runs under a re-entrant build lock, so concurrent first
//! requests for the same or mutually dependent types are serialized, while
//! a build may recurse into the plans its fields need.
//!
//! 1. A placeholder plan is installed before any field is bound. A type that
//!    reaches itself through its fields finds the placeholder and captures it
//!    instead of recursing.
//! 2. The schema is compiled and the placeholder's steps are set.
//! 3. When the outermost build returns, every plan of that build is
//!    published. If any step failed, all of them are removed instead, so no
//!    surviving plan references a failed placeholder.
//!
//! Lookups of published plans only take a shared read lock. Plans still
//! being built are never handed to other threads.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::cell::RefCell;
use core::fmt;

use parking_lot::{ReentrantMutex, RwLock};
use vc_stream::{DataInput, DataOutput};

use crate::error::Result;
use crate::object::{Context, Marshal};
use crate::plan::{self, ErasedPlan, Plan, PlanState};
use crate::stream::{ObjectInput, ObjectOutput};

// -----------------------------------------------------------------------------
// Modules

mod type_map;

use type_map::{TypeIdMap, new_type_map};

// -----------------------------------------------------------------------------
// Entry

struct Entry<C: Context> {
    typed: Arc<dyn Any + Send + Sync>,
    erased: Arc<dyn ErasedPlan<C>>,
    published: bool,
}

impl<C: Context> Entry<C> {
    fn new<T: Marshal<C>>(plan: Arc<Plan<T, C>>) -> Self {
        Self {
            typed: plan.clone(),
            erased: plan,
            published: false,
        }
    }

    fn typed<T: Marshal<C>>(&self) -> Arc<Plan<T, C>> {
        self.typed
            .clone()
            .downcast::<Plan<T, C>>()
            .unwrap_or_else(|_| unreachable!("plan entries are keyed by their own `TypeId`"))
    }
}

#[derive(Default)]
struct BuildSession {
    depth: usize,
    failed: bool,
    pending: Vec<TypeId>,
}

// -----------------------------------------------------------------------------
// Registry

/// Cache of compiled plans and shared custom serializer instances.
///
/// A registry is an explicit value: create one per process or session and
/// hand it to every stream facade that should share plans.
///
/// # Examples
///
/// ```
/// use vc_serial::{Marshal, Registry};
///
/// #[derive(Marshal, Default, Debug, PartialEq)]
/// struct Point {
///     #[marshal(compact)]
///     x: i32,
///     #[marshal(compact)]
///     y: i32,
/// }
///
/// let registry = Registry::new();
/// let bytes = registry.to_bytes(&(), &Point { x: 3, y: -1 }).unwrap();
/// assert_eq!(bytes, [0x03, 0x81]);
///
/// let point: Point = registry.from_bytes(&(), &bytes).unwrap();
/// assert_eq!(point, Point { x: 3, y: -1 });
/// ```
pub struct Registry<C: Context> {
    plans: RwLock<TypeIdMap<Entry<C>>>,
    serializers: RwLock<TypeIdMap<Arc<dyn Any + Send + Sync>>>,
    build: ReentrantMutex<RefCell<BuildSession>>,
}

impl<C: Context> Registry<C> {
    pub fn new() -> Self {
        Self {
            plans: RwLock::new(new_type_map()),
            serializers: RwLock::new(new_type_map()),
            build: ReentrantMutex::new(RefCell::new(BuildSession::default())),
        }
    }

    /// Returns the plan of `T`, building it on first request.
    ///
    /// Repeated calls return the same `Arc`. During a build on the calling
    /// thread this may return a placeholder whose steps are set later.
    pub fn plan<T: Marshal<C>>(&self) -> Result<Arc<Plan<T, C>>> {
        let id = TypeId::of::<T>();
        let published = self
            .plans
            .read()
            .get(&id)
            .filter(|entry| entry.published)
            .map(Entry::typed::<T>);
        match published {
            Some(plan) => Ok(plan),
            None => self.build::<T>(),
        }
    }

    /// Type-erased [`Registry::plan`].
    pub fn erased_plan<T: Marshal<C>>(&self) -> Result<Arc<dyn ErasedPlan<C>>> {
        let plan: Arc<dyn ErasedPlan<C>> = self.plan::<T>()?;
        Ok(plan)
    }

    /// Build state of `T`'s plan, `None` if no plan exists.
    pub fn state<T: Marshal<C>>(&self) -> Option<PlanState> {
        self.plans
            .read()
            .get(&TypeId::of::<T>())
            .map(|entry| entry.erased.state())
    }

    /// Number of plans in the cache, placeholders included.
    pub fn len(&self) -> usize {
        self.plans.read().len()
    }

    /// Returns the shared instance of serializer `S`, creating it on first
    /// request.
    pub fn serializer<S: Default + Send + Sync + 'static>(&self) -> Arc<S> {
        let id = TypeId::of::<S>();
        let cached = self.serializers.read().get(&id).cloned();
        let instance = match cached {
            Some(instance) => instance,
            None => self
                .serializers
                .write()
                .entry(id)
                .or_insert_with(|| {
                    log::trace!("created serializer `{}`", core::any::type_name::<S>());
                    Arc::new(S::default())
                })
                .clone(),
        };
        instance
            .downcast::<S>()
            .unwrap_or_else(|_| unreachable!("serializers are keyed by their own `TypeId`"))
    }

    /// Reads one `T` from `stream`.
    ///
    /// Shorthand for [`ObjectInput::read`] on a fresh facade.
    pub fn read_from<T: Marshal<C>>(&self, stream: &mut dyn DataInput, context: &C) -> Result<T> {
        ObjectInput::new(stream, context, self).read()
    }

    /// Writes `value` to `stream`.
    ///
    /// Shorthand for [`ObjectOutput::write`] on a fresh facade.
    pub fn write_to<T: Marshal<C>>(
        &self,
        stream: &mut dyn DataOutput,
        context: &C,
        value: &T,
    ) -> Result<()> {
        ObjectOutput::new(stream, context, self).write(value)
    }

    /// Reads one `T` from an in-memory buffer in the default charset.
    pub fn from_bytes<T: Marshal<C>>(&self, context: &C, bytes: &[u8]) -> Result<T> {
        let mut stream = vc_stream::DataInputStream::new(bytes, vc_stream::Charset::default());
        self.read_from(&mut stream, context)
    }

    /// Writes `value` into a new buffer in the default charset.
    pub fn to_bytes<T: Marshal<C>>(&self, context: &C, value: &T) -> Result<Vec<u8>> {
        let mut stream = vc_stream::DataOutputStream::new(Vec::new(), vc_stream::Charset::default());
        self.write_to(&mut stream, context, value)?;
        Ok(stream.into_inner())
    }

    // -------------------------------------------------------------------------
    // Build

    #[cold]
    fn build<T: Marshal<C>>(&self) -> Result<Arc<Plan<T, C>>> {
        let id = TypeId::of::<T>();
        let session = self.build.lock();

        // Published by another thread while we waited, or a placeholder of
        // the build this thread is running.
        let existing = self.plans.read().get(&id).map(Entry::typed::<T>);
        if let Some(plan) = existing {
            return Ok(plan);
        }

        let schema = T::schema();
        let plan = Arc::new(Plan::<T, C>::placeholder(schema.name()));
        self.plans.write().insert(id, Entry::new(plan.clone()));
        log::trace!("installed placeholder plan for `{}`", plan.type_name());

        let mut scope = BuildScope::enter(self, &session, id);
        let compiled = plan::compile(schema, self)?;
        plan.finish(compiled);
        scope.succeed();

        if let Some((read, write)) = plan.step_count() {
            log::debug!(
                "built plan for `{}`: {read} read step(s), {write} write step(s)",
                plan.type_name()
            );
        }
        Ok(plan)
    }

    fn publish(&self, pending: &[TypeId]) {
        let mut plans = self.plans.write();
        for id in pending {
            if let Some(entry) = plans.get_mut(id) {
                entry.published = true;
            }
        }
    }

    fn rollback(&self, pending: &[TypeId]) {
        let mut plans = self.plans.write();
        for id in pending {
            if let Some(entry) = plans.remove(id) {
                log::warn!("discarded plan for `{}` after a failed build", entry.erased.type_name());
            }
        }
    }
}

impl<C: Context> Default for Registry<C> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Context> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plans = self.plans.read();
        f.debug_struct("Registry")
            .field("plans", &plans.values().map(|e| e.erased.type_name()).collect::<Vec<_>>())
            .field("serializers", &self.serializers.read().len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// BuildScope

/// One level of a (possibly nested) build on the current thread.
///
/// Dropping the outermost scope publishes or rolls back every plan of the
/// build, including when a schema panics.
struct BuildScope<'a, C: Context> {
    registry: &'a Registry<C>,
    session: &'a RefCell<BuildSession>,
    succeeded: bool,
}

impl<'a, C: Context> BuildScope<'a, C> {
    fn enter(registry: &'a Registry<C>, session: &'a RefCell<BuildSession>, id: TypeId) -> Self {
        let mut state = session.borrow_mut();
        state.depth += 1;
        state.pending.push(id);
        drop(state);
        Self {
            registry,
            session,
            succeeded: false,
        }
    }

    #[inline]
    fn succeed(&mut self) {
        self.succeeded = true;
    }
}

impl<C: Context> Drop for BuildScope<'_, C> {
    fn drop(&mut self) {
        let mut state = self.session.borrow_mut();
        state.depth -= 1;
        state.failed |= !self.succeeded;
        if state.depth > 0 {
            return;
        }

        let pending = core::mem::take(&mut state.pending);
        let failed = core::mem::replace(&mut state.failed, false);
        drop(state);

        if failed {
            self.registry.rollback(&pending);
        } else {
            self.registry.publish(&pending);
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use crate::{
        FieldDescriptor, Marshal, MarshalError, Modifiers, PlanState, Registry, SchemaError,
        SchemaType, object_codec,
    };
    use crate::codec::{Codec, FieldType};
    use crate::schema::{FieldMeta, Kind};

    #[derive(Default)]
    struct Leaf {
        value: i32,
    }

    impl Marshal<()> for Leaf {
        fn schema() -> SchemaType<Self, ()> {
            SchemaType::new("Leaf")
                .constructor(Leaf::default)
                .field(FieldDescriptor::new("value", |l: &Leaf| &l.value, |l| &mut l.value))
        }
    }

    // Only built by `plans_are_memoized`, so the counter is not shared with
    // tests running in parallel.
    static COUNTED_SCHEMAS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Default)]
    struct Counted {
        value: i64,
    }

    impl Marshal<()> for Counted {
        fn schema() -> SchemaType<Self, ()> {
            COUNTED_SCHEMAS.fetch_add(1, Ordering::Relaxed);
            SchemaType::new("Counted")
                .constructor(Counted::default)
                .field(FieldDescriptor::new("value", |c: &Counted| &c.value, |c| &mut c.value))
        }
    }

    #[test]
    fn plans_are_memoized() {
        let registry = Registry::<()>::new();
        assert_eq!(registry.state::<Counted>(), None);

        let first = registry.plan::<Counted>().unwrap();
        let second = registry.plan::<Counted>().unwrap();
        registry.to_bytes(&(), &Counted { value: 5 }).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(COUNTED_SCHEMAS.load(Ordering::Relaxed), 1);
        assert_eq!(registry.state::<Counted>(), Some(PlanState::Built));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn concurrent_first_requests_share_one_plan() {
        let registry = Registry::<()>::new();
        let plans: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| registry.plan::<Leaf>().unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(plans.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    // A node reaching itself through its children.
    #[derive(Default)]
    struct Node {
        id: i32,
        children: Vec<Node>,
    }

    impl FieldType<()> for Node {
        const KIND: Kind = Kind::Object;

        fn codec(meta: &FieldMeta, registry: &Registry<()>) -> crate::Result<Codec<Self, ()>> {
            object_codec(meta, registry)
        }
    }

    impl Marshal<()> for Node {
        fn schema() -> SchemaType<Self, ()> {
            SchemaType::new("Node")
                .constructor(Node::default)
                .field(
                    FieldDescriptor::new("id", |n: &Node| &n.id, |n| &mut n.id)
                        .modifiers(Modifiers::COMPACT),
                )
                .field(FieldDescriptor::new("children", |n: &Node| &n.children, |n| &mut n.children))
        }
    }

    #[test]
    fn self_reference_builds_through_placeholder() {
        let registry = Registry::<()>::new();
        registry.plan::<Node>().unwrap();
        assert_eq!(registry.state::<Node>(), Some(PlanState::Built));

        let tree = Node {
            id: 1,
            children: vec![Node { id: 2, children: Vec::new() }, Node::default()],
        };
        let bytes = registry.to_bytes(&(), &tree).unwrap();
        assert_eq!(bytes, [1, 2, 2, 0, 0, 0]);

        let back: Node = registry.from_bytes(&(), &bytes).unwrap();
        assert_eq!(back.id, 1);
        assert_eq!(back.children.len(), 2);
        assert_eq!(back.children[0].id, 2);
    }

    // Valid on its own, but holds a `Broken`.
    #[derive(Default)]
    struct Holder {
        broken: Broken,
    }

    #[derive(Default)]
    struct Broken {
        name: String,
    }

    impl FieldType<()> for Broken {
        const KIND: Kind = Kind::Object;

        fn codec(meta: &FieldMeta, registry: &Registry<()>) -> crate::Result<Codec<Self, ()>> {
            object_codec(meta, registry)
        }
    }

    impl Marshal<()> for Holder {
        fn schema() -> SchemaType<Self, ()> {
            SchemaType::new("Holder")
                .constructor(Holder::default)
                .field(FieldDescriptor::new("broken", |h: &Holder| &h.broken, |h| &mut h.broken))
        }
    }

    impl Marshal<()> for Broken {
        fn schema() -> SchemaType<Self, ()> {
            SchemaType::new("Broken")
                .constructor(Broken::default)
                .field(
                    FieldDescriptor::new("name", |b: &Broken| &b.name, |b| &mut b.name)
                        .modifiers(Modifiers::COMPACT),
                )
        }
    }

    #[test]
    fn failed_build_leaves_nothing_behind() {
        let registry = Registry::<()>::new();
        let err = registry.plan::<Holder>().unwrap_err();
        assert!(matches!(
            err,
            MarshalError::Schema {
                type_name: "Broken",
                reason: SchemaError::Modifier { field: "name", .. },
            }
        ));
        assert_eq!(registry.state::<Holder>(), None);
        assert_eq!(registry.state::<Broken>(), None);
        assert_eq!(registry.len(), 0);

        // Failures are not cached either.
        assert!(registry.plan::<Broken>().is_err());
    }

    struct Orphan;

    impl Marshal<()> for Orphan {
        fn schema() -> SchemaType<Self, ()> {
            SchemaType::new("Orphan")
        }
    }

    #[test]
    fn missing_constructor_is_a_schema_error() {
        let registry = Registry::<()>::new();
        let err = registry.plan::<Orphan>().unwrap_err();
        assert!(matches!(
            err,
            MarshalError::Schema {
                type_name: "Orphan",
                reason: SchemaError::NoConstructor,
            }
        ));
    }

    #[derive(Default)]
    struct Unit;

    #[test]
    fn serializers_are_shared() {
        let registry = Registry::<()>::new();
        let first = registry.serializer::<Unit>();
        let second = registry.serializer::<Unit>();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
