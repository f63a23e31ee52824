use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashSet};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::api::capture::Value;
use crate::prelude::Collectable;

trait Assign: Send + Sync {
    fn assign(&self, target: &mut dyn Any, values: &[Value]);
}

trait Descend: Send + Sync {
    fn descend<'t>(&self, target: &'t mut dyn Any) -> &'t mut dyn Any;
}

fn parent<P: Any>(target: &mut dyn Any) -> &mut P {
    target
        .downcast_mut::<P>()
        .expect("internal error - accessor must walk its declared parent type")
}

fn extract<T: Any + Clone>(value: &Value) -> T {
    value
        .downcast_ref::<T>()
        .expect("internal error - value must convert to the accessor element type")
        .clone()
}

struct ScalarSlot<P, T> {
    field: fn(&mut P) -> &mut T,
}

impl<P, T> Assign for ScalarSlot<P, T>
where
    P: Any,
    T: Any + Clone,
{
    fn assign(&self, target: &mut dyn Any, values: &[Value]) {
        if let Some(value) = values.last() {
            *(self.field)(parent::<P>(target)) = extract::<T>(value);
        }
    }
}

struct OptionalSlot<P, T> {
    field: fn(&mut P) -> &mut Option<T>,
}

impl<P, T> Assign for OptionalSlot<P, T>
where
    P: Any,
    T: Any + Clone,
{
    fn assign(&self, target: &mut dyn Any, values: &[Value]) {
        if let Some(value) = values.last() {
            (self.field)(parent::<P>(target)).replace(extract::<T>(value));
        }
    }
}

struct CollectionSlot<P, C, T> {
    field: fn(&mut P) -> &mut C,
    _phantom: PhantomData<fn() -> T>,
}

impl<P, C, T> Assign for CollectionSlot<P, C, T>
where
    P: Any,
    C: Collectable<T> + 'static,
    T: Any + Clone,
{
    fn assign(&self, target: &mut dyn Any, values: &[Value]) {
        let collection = (self.field)(parent::<P>(target));

        for value in values {
            collection.add(extract::<T>(value));
        }
    }
}

struct OptionalCollectionSlot<P, C, T> {
    field: fn(&mut P) -> &mut Option<C>,
    _phantom: PhantomData<fn() -> T>,
}

impl<P, C, T> Assign for OptionalCollectionSlot<P, C, T>
where
    P: Any,
    C: Collectable<T> + Default + 'static,
    T: Any + Clone,
{
    fn assign(&self, target: &mut dyn Any, values: &[Value]) {
        if values.is_empty() {
            return;
        }

        let collection = (self.field)(parent::<P>(target)).get_or_insert_with(C::default);

        for value in values {
            collection.add(extract::<T>(value));
        }
    }
}

struct FieldStep<P, C> {
    field: fn(&mut P) -> &mut C,
}

impl<P: Any, C: Any> Descend for FieldStep<P, C> {
    fn descend<'t>(&self, target: &'t mut dyn Any) -> &'t mut dyn Any {
        (self.field)(parent::<P>(target))
    }
}

struct LazyStep<P, C> {
    field: fn(&mut P) -> &mut Option<C>,
}

impl<P: Any, C: Any + Default> Descend for LazyStep<P, C> {
    fn descend<'t>(&self, target: &'t mut dyn Any) -> &'t mut dyn Any {
        (self.field)(parent::<P>(target)).get_or_insert_with(C::default)
    }
}

/// The terminal field of an [`Accessor`]: where converted values land.
///
/// Scalar slots take the last value (last write wins).
/// Collection slots append every value, in order.
#[derive(Clone)]
pub struct Slot {
    name: String,
    element: TypeId,
    element_name: &'static str,
    collection: bool,
    assign: Arc<dyn Assign>,
}

impl Slot {
    /// A plain `T` field.
    pub fn scalar<P, T>(name: impl Into<String>, field: fn(&mut P) -> &mut T) -> Self
    where
        P: Any,
        T: Any + Clone + Send + Sync,
    {
        Self::new::<T>(name, false, Arc::new(ScalarSlot { field }))
    }

    /// An `Option<T>` field; set to `Some` when values are written.
    pub fn optional<P, T>(name: impl Into<String>, field: fn(&mut P) -> &mut Option<T>) -> Self
    where
        P: Any,
        T: Any + Clone + Send + Sync,
    {
        Self::new::<T>(name, false, Arc::new(OptionalSlot { field }))
    }

    /// A [`Collectable`] field of `T` (ex: `Vec<T>`).
    pub fn collection<P, C, T>(name: impl Into<String>, field: fn(&mut P) -> &mut C) -> Self
    where
        P: Any,
        C: Collectable<T> + 'static,
        T: Any + Clone + Send + Sync,
    {
        Self::new::<T>(
            name,
            true,
            Arc::new(CollectionSlot {
                field,
                _phantom: PhantomData,
            }),
        )
    }

    /// An `Option` of a [`Collectable`] field; created empty on the first write.
    pub fn optional_collection<P, C, T>(
        name: impl Into<String>,
        field: fn(&mut P) -> &mut Option<C>,
    ) -> Self
    where
        P: Any,
        C: Collectable<T> + Default + 'static,
        T: Any + Clone + Send + Sync,
    {
        Self::new::<T>(
            name,
            true,
            Arc::new(OptionalCollectionSlot {
                field,
                _phantom: PhantomData,
            }),
        )
    }

    fn new<T: Any>(name: impl Into<String>, collection: bool, assign: Arc<dyn Assign>) -> Self {
        Self {
            name: name.into(),
            element: TypeId::of::<T>(),
            element_name: std::any::type_name::<T>(),
            collection,
            assign,
        }
    }
}

/// One hop of an [`AccessorPath`], from a struct into one of its (nested) struct fields.
#[derive(Clone)]
pub struct Step {
    name: String,
    descend: Arc<dyn Descend>,
}

impl Step {
    /// A plain nested field `C`.
    pub fn field<P, C>(name: impl Into<String>, field: fn(&mut P) -> &mut C) -> Self
    where
        P: Any,
        C: Any,
    {
        Self {
            name: name.into(),
            descend: Arc::new(FieldStep { field }),
        }
    }

    /// An `Option<C>` nested field; `C::default()` is created the first time a value is written through it.
    pub fn optional<P, C>(name: impl Into<String>, field: fn(&mut P) -> &mut Option<C>) -> Self
    where
        P: Any,
        C: Any + Default,
    {
        Self {
            name: name.into(),
            descend: Arc::new(LazyStep { field }),
        }
    }
}

/// The steps from a command's target type down to some nested struct.
///
/// Used while declaring options so that delegated declarations are bound relative to the command target.
#[derive(Clone, Default)]
pub struct AccessorPath {
    steps: Vec<Step>,
}

impl AccessorPath {
    /// The empty path: the command target itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend this path by one step.
    pub fn child(&self, step: Step) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    /// Terminate this path at a slot.
    pub fn leaf(&self, slot: Slot) -> Accessor {
        Accessor {
            steps: self.steps.clone(),
            slot,
        }
    }
}

impl std::fmt::Debug for AccessorPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.steps.iter().map(|s| s.name.as_str()).collect();
        write!(f, "AccessorPath[{}]", names.join("."))
    }
}

/// A binding from converted values to one field of a command's target type.
///
/// ### Example
/// ```
/// # use gantry_builder as gantry;
/// use gantry::{AccessorPath, Slot, Step, Value};
///
/// #[derive(Default)]
/// struct Network {
///     port: u16,
/// }
///
/// #[derive(Default)]
/// struct Serve {
///     network: Option<Network>,
/// }
///
/// let accessor = AccessorPath::root()
///     .child(Step::optional::<Serve, Network>("network", |s| &mut s.network))
///     .leaf(Slot::scalar::<Network, u16>("port", |n| &mut n.port));
///
/// let mut serve = Serve::default();
/// accessor.write(&mut serve, &[]);
/// assert!(serve.network.is_none());
///
/// accessor.write(&mut serve, &[Value::new("80", 80u16), Value::new("8080", 8080u16)]);
/// assert_eq!(serve.network.unwrap().port, 8080);
/// ```
#[derive(Clone)]
pub struct Accessor {
    steps: Vec<Step>,
    slot: Slot,
}

impl Accessor {
    /// The dotted field path (ex: `network.port`).
    pub fn path(&self) -> String {
        self.steps
            .iter()
            .map(|s| s.name.as_str())
            .chain(std::iter::once(self.slot.name.as_str()))
            .collect::<Vec<&str>>()
            .join(".")
    }

    /// Whether the slot collects every value.
    pub fn is_collection(&self) -> bool {
        self.slot.collection
    }

    pub(crate) fn element_type(&self) -> TypeId {
        self.slot.element
    }

    pub(crate) fn element_name(&self) -> &'static str {
        self.slot.element_name
    }

    /// Write `values` into `target`, creating any intermediate `Option` structs on the way.
    /// Nothing is touched (nor created) when `values` is empty.
    ///
    /// Panics if `target` or `values` don't match the types this accessor was declared with.
    pub fn write(&self, target: &mut dyn Any, values: &[Value]) {
        if values.is_empty() {
            return;
        }

        let mut current = target;

        for step in &self.steps {
            current = step.descend.descend(current);
        }

        self.slot.assign.assign(current, values);
    }
}

impl std::fmt::Debug for Accessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Accessor[{}]", self.path())
    }
}

impl<T> Collectable<T> for Vec<T> {
    fn add(&mut self, item: T) {
        self.push(item);
    }
}

impl<T: Eq + std::hash::Hash> Collectable<T> for HashSet<T> {
    fn add(&mut self, item: T) {
        self.insert(item);
    }
}

impl<T: Ord> Collectable<T> for BTreeSet<T> {
    fn add(&mut self, item: T) {
        self.insert(item);
    }
}
