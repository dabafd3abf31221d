use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug, Formatter};
use std::ptr;
use std::rc::Rc;

use derive_more::IsVariant;

use super::TypeTag;

/// Anything that can be classified by a [`TypeTag`] and therefore checked by a
/// [`Filter`](super::Filter).
pub trait Restrictable {
    /// Classifies this value. Objects report their most-derived class.
    fn type_tag(&self) -> TypeTag;

    /// Produces a copy of this value that shares nothing with the original. Containers configured
    /// with `reference: false` store values through this method.
    fn detach(self) -> Self where Self: Sized {
        self
    }
}

/// Classifies any [`Restrictable`] value.
pub fn classify<T: Restrictable + ?Sized>(value: &T) -> TypeTag {
    value.type_tag()
}

/// A dynamically shaped value that can be held by restricted containers.
///
/// Callable and closure shapes are their own variants, so a callable is never mistaken for an
/// array or an object.
#[derive(Debug, Clone, PartialEq, IsVariant)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(Object),
    Resource(Resource),
    Closure(Closure),
    FunctionRef(String),
    Callable(Callable),
}

impl Value {
    /// Deep-copies the value. Objects nested anywhere inside are copied into new handles.
    ///
    /// Each object is copied once, so objects shared within the value stay shared in the copy and
    /// self-containing objects keep their cycles, pointing at the copy instead of the original.
    pub fn detached(&self) -> Value {
        self.detached_with(&mut CopyMemo::new())
    }

    fn detached_with(&self, memo: &mut CopyMemo) -> Value {
        match self {
            Value::Array(items) => Value::Array(
                items.iter().map(|item| item.detached_with(memo)).collect(),
            ),
            Value::Object(object) => Value::Object(object.detached_with(memo)),
            Value::Callable(Callable { target: CallTarget::Object(object), method }) => {
                Value::Callable(Callable {
                    target: CallTarget::Object(object.detached_with(memo)),
                    method: method.clone(),
                })
            },
            other => other.clone(),
        }
    }

    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    pub const fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl Restrictable for Value {
    fn type_tag(&self) -> TypeTag {
        match self {
            Value::Callable(_) => TypeTag::Callable,
            Value::Closure(_) => TypeTag::Closure,
            Value::FunctionRef(_) => TypeTag::FunctionRef,
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Bool,
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::String(_) => TypeTag::String,
            Value::Array(_) => TypeTag::Array,
            Value::Object(object) => object.type_tag(),
            Value::Resource(_) => TypeTag::Resource,
        }
    }

    fn detach(self) -> Self {
        self.detached()
    }
}

macro_rules! value_from {
    ($($from:ty => $variant:ident($conv:expr)),* $(,)?) => {
        $(
            impl From<$from> for Value {
                fn from(value: $from) -> Self {
                    Value::$variant($conv(value))
                }
            }
        )*
    };
}

value_from! {
    bool => Bool(|v| v),
    i32 => Int(i64::from),
    i64 => Int(|v| v),
    u32 => Int(i64::from),
    f32 => Float(f64::from),
    f64 => Float(|v| v),
    String => String(|v| v),
    &str => String(str::to_owned),
    Vec<Value> => Array(|v| v),
    Object => Object(|v| v),
    Resource => Resource(|v| v),
    Closure => Closure(|v| v),
    Callable => Callable(|v| v),
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// The contents of an [`Object`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectData {
    pub class: Option<String>,
    pub properties: BTreeMap<String, Value>,
}

/// A shared handle to an object. Cloning the handle aliases the object, and equality is identity.
#[derive(Clone)]
pub struct Object(pub(crate) Rc<RefCell<ObjectData>>);

impl Object {
    /// Creates an object of the given class with no properties.
    pub fn new(class: impl Into<String>) -> Object {
        Object::from_data(ObjectData {
            class: Some(class.into()),
            properties: BTreeMap::new(),
        })
    }

    /// Creates a classless object, which classifies as [`TypeTag::Object`].
    pub fn anonymous() -> Object {
        Object::from_data(ObjectData::default())
    }

    pub fn from_data(data: ObjectData) -> Object {
        Object(Rc::new(RefCell::new(data)))
    }

    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Object {
        self.set(name, value);
        self
    }

    pub fn class(&self) -> Option<String> {
        self.0.borrow().class.clone()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().properties.get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.borrow_mut().properties.insert(name.into(), value.into())
    }

    pub fn borrow(&self) -> Ref<'_, ObjectData> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, ObjectData> {
        self.0.borrow_mut()
    }

    /// Returns true if both handles refer to the same object.
    pub fn same(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Deep-copies the object. See [`Value::detached`].
    pub fn detached(&self) -> Object {
        self.detached_with(&mut CopyMemo::new())
    }

    fn detached_with(&self, memo: &mut CopyMemo) -> Object {
        if let Some(copy) = memo.get(&Rc::as_ptr(&self.0)) {
            return copy.clone();
        }

        // Registered before the properties are copied, so references back to this object resolve
        // to the copy.
        let copy = Object::from_data(ObjectData {
            class: self.0.borrow().class.clone(),
            properties: BTreeMap::new(),
        });
        memo.insert(Rc::as_ptr(&self.0), copy.clone());

        let properties: BTreeMap<String, Value> = self.0.borrow().properties.iter()
            .map(|(name, value)| (name.clone(), value.detached_with(memo)))
            .collect();
        copy.0.borrow_mut().properties = properties;
        copy
    }

    /// Writes the class and address only, without following properties.
    fn fmt_shallow(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let class = self.0.try_borrow().ok().and_then(|data| data.class.clone());
        write!(f, "Object({} @ {:p})", class.as_deref().unwrap_or("<anonymous>"), Rc::as_ptr(&self.0))
    }
}

/// Originals already copied during one deep copy, keyed by their allocation.
type CopyMemo = HashMap<*const RefCell<ObjectData>, Object>;

/// Debug view of a property value that prints nested objects with [`Object::fmt_shallow`].
struct Shallow<'a>(&'a Value);

impl Debug for Shallow<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Object(object) => object.fmt_shallow(f),
            Value::Array(items) => f.debug_list().entries(items.iter().map(Shallow)).finish(),
            Value::Callable(Callable { target: CallTarget::Object(object), method }) => {
                f.write_str("Callable(")?;
                object.fmt_shallow(f)?;
                write!(f, "::{method})")
            },
            other => Debug::fmt(other, f),
        }
    }
}

impl Restrictable for Object {
    fn type_tag(&self) -> TypeTag {
        match &self.0.borrow().class {
            Some(class) => TypeTag::TypedObject(class.clone()),
            None => TypeTag::Object,
        }
    }

    fn detach(self) -> Self {
        self.detached()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Debug for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(data) => f.debug_struct("Object")
                .field("class", &data.class)
                .field("properties", &ShallowProperties(&data.properties))
                .finish(),
            Err(_) => f.write_str("Object(<borrowed>)"),
        }
    }
}

struct ShallowProperties<'a>(&'a BTreeMap<String, Value>);

impl Debug for ShallowProperties<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(name, value)| (name, Shallow(value))))
            .finish()
    }
}

/// An opaque external handle, identified by a number and the kind of thing it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    pub id: u64,
    pub kind: String,
}

impl Resource {
    pub fn new(id: u64, kind: impl Into<String>) -> Resource {
        Resource { id, kind: kind.into() }
    }
}

impl Restrictable for Resource {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Resource
    }
}

type ClosureFn = dyn Fn(&[Value]) -> Value;

/// An anonymous function value. Equality is identity.
#[derive(Clone)]
pub struct Closure(Rc<ClosureFn>);

impl Closure {
    pub fn new(f: impl Fn(&[Value]) -> Value + 'static) -> Closure {
        Closure(Rc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }
}

impl Restrictable for Closure {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Closure
    }
}

impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl Debug for Closure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Closure(..)")
    }
}

/// The receiver of a [`Callable`]: either an object instance or a class, for static methods.
#[derive(Debug, Clone, PartialEq, IsVariant)]
pub enum CallTarget {
    Object(Object),
    Class(String),
}

/// A method bound to a receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct Callable {
    pub target: CallTarget,
    pub method: String,
}

impl Callable {
    pub fn bound(object: Object, method: impl Into<String>) -> Callable {
        Callable { target: CallTarget::Object(object), method: method.into() }
    }

    pub fn fixed(class: impl Into<String>, method: impl Into<String>) -> Callable {
        Callable { target: CallTarget::Class(class.into()), method: method.into() }
    }
}

impl Restrictable for Callable {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Callable
    }
}

macro_rules! restrictable_scalar {
    ($tag:ident: $($ty:ty),*) => {
        $(
            impl Restrictable for $ty {
                fn type_tag(&self) -> TypeTag {
                    TypeTag::$tag
                }
            }
        )*
    };
}

restrictable_scalar!(Int: i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
restrictable_scalar!(Float: f32, f64);
restrictable_scalar!(Bool: bool);
restrictable_scalar!(String: String, str, char);
restrictable_scalar!(Null: ());

impl<T: Restrictable + ?Sized> Restrictable for &T {
    fn type_tag(&self) -> TypeTag {
        (**self).type_tag()
    }
}

impl<T: Restrictable> Restrictable for Option<T> {
    fn type_tag(&self) -> TypeTag {
        match self {
            Some(value) => value.type_tag(),
            None => TypeTag::Null,
        }
    }

    fn detach(self) -> Self {
        self.map(Restrictable::detach)
    }
}

impl<T: Restrictable> Restrictable for Vec<T> {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Array
    }

    fn detach(self) -> Self {
        self.into_iter().map(Restrictable::detach).collect()
    }
}
