//! Declarations the resolver bound names to
//!
//! The element model is an arena of [`Element`]s plus per-class member
//! tables. [`TreeElements`] carries the per-unit resolution results: which
//! element a node refers to and which type an annotation or literal denotes.

use crate::ast::{NodeId, Span};
use corvid_types::{ClassId, Type, TypeContext, TypeId};
use rustc_hash::{FxHashMap, FxHashSet};

/// Index of an element in an [`ElementModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Class,
    Typedef,
    TypeVariable,
    /// Library import prefix: `import 'x' as p;`
    Prefix,
    Function,
    Getter,
    Setter,
    Field,
    Variable,
    Parameter,
    GenerativeConstructor,
    FactoryConstructor,
    /// Placeholder for a name the resolver could not bind
    Erroneous,
}

/// A declaration
///
/// `ty` is the declared type: the function type for functions, getters,
/// setters and constructors, the declared type for fields, variables and
/// parameters, and the denoted type for classes, typedefs and type variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub kind: ElementKind,
    pub ty: TypeId,
    pub enclosing_class: Option<ClassId>,
    pub is_static: bool,
    pub span: Span,
    /// The declared class, for class elements
    pub class: Option<ClassId>,
}

impl Element {
    pub fn new(name: impl Into<String>, kind: ElementKind, ty: TypeId) -> Self {
        Element {
            name: name.into(),
            kind,
            ty,
            enclosing_class: None,
            is_static: false,
            span: Span::default(),
            class: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn is_instance_member(&self) -> bool {
        self.enclosing_class.is_some()
            && !self.is_static
            && matches!(
                self.kind,
                ElementKind::Function | ElementKind::Getter | ElementKind::Setter | ElementKind::Field
            )
    }

    pub fn implies_type(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::Class | ElementKind::Typedef | ElementKind::TypeVariable
        )
    }

    pub fn is_prefix(&self) -> bool {
        self.kind == ElementKind::Prefix
    }

    pub fn is_erroneous(&self) -> bool {
        self.kind == ElementKind::Erroneous
    }

    pub fn is_local(&self) -> bool {
        matches!(self.kind, ElementKind::Variable | ElementKind::Parameter)
            && self.enclosing_class.is_none()
    }
}

/// Absent or erroneous
pub fn is_unresolved(element: Option<&Element>) -> bool {
    element.is_none_or(|e| e.is_erroneous())
}

/// A member found on a receiver type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    /// The supertype of the receiver that declares the member, instantiated
    pub receiver: TypeId,
    pub element: ElementId,
    /// Only a setter exists under this name
    pub setter_only: bool,
}

impl Member {
    /// The member's type as seen through its receiver
    ///
    /// Getters yield their return type and setters their parameter type.
    pub fn compute_type(&self, types: &TypeContext, model: &ElementModel) -> TypeId {
        let dynamic = types.core().dynamic;
        let element = match model.get(self.element) {
            Some(element) => element,
            None => return dynamic,
        };

        let declared = match (types.get(self.receiver).as_deref(), element.enclosing_class) {
            (Some(Type::Interface(iface)), Some(class)) => {
                let params = types
                    .class_info(class)
                    .map(|info| info.type_params)
                    .unwrap_or_default();
                if class == iface.class {
                    types.substitute(element.ty, &params, &iface.type_args)
                } else {
                    element.ty
                }
            }
            _ => element.ty,
        };
        accessor_type(types, element.kind, declared)
    }
}

/// Getter → return type, setter → first parameter type, otherwise the type itself
pub(crate) fn accessor_type(types: &TypeContext, kind: ElementKind, declared: TypeId) -> TypeId {
    let dynamic = types.core().dynamic;
    match kind {
        ElementKind::Getter => types
            .get(types.unalias(declared))
            .and_then(|ty| ty.as_function().map(|f| f.return_type))
            .unwrap_or(dynamic),
        ElementKind::Setter => types
            .get(types.unalias(declared))
            .and_then(|ty| ty.as_function().and_then(|f| f.first_param()))
            .unwrap_or(dynamic),
        _ => declared,
    }
}

/// Arena of all elements plus per-class member tables
#[derive(Debug, Clone, Default)]
pub struct ElementModel {
    elements: Vec<Element>,
    members: FxHashMap<ClassId, FxHashMap<String, ElementId>>,
    class_elements: FxHashMap<ClassId, ElementId>,
}

impl ElementModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(element);
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Register the element for a class already declared in `types`
    pub fn add_class(&mut self, types: &TypeContext, class: ClassId) -> ElementId {
        let mut element = Element::new(types.class_name(class), ElementKind::Class, types.this_type(class));
        element.class = Some(class);
        let id = self.add(element);
        self.class_elements.insert(class, id);
        id
    }

    pub fn class_element(&self, class: ClassId) -> Option<ElementId> {
        self.class_elements.get(&class).copied()
    }

    /// Add a member to `class`; setters are keyed `name=`
    pub fn add_member(&mut self, class: ClassId, mut element: Element) -> ElementId {
        element.enclosing_class = Some(class);
        let key = if element.kind == ElementKind::Setter {
            format!("{}=", element.name)
        } else {
            element.name.clone()
        };
        let id = self.add(element);
        self.members.entry(class).or_default().insert(key, id);
        id
    }

    /// Member declared directly in `class` under `key`
    pub fn local_member(&self, class: ClassId, key: &str) -> Option<ElementId> {
        self.members.get(&class).and_then(|table| table.get(key)).copied()
    }

    /// Find `name` on `receiver`, searching the superclass chain before
    /// implemented interfaces
    ///
    /// A getter, field or method wins over a setter of the same name; when
    /// only `name=` exists the result is a setter-only member.
    pub fn lookup_member(&self, types: &TypeContext, receiver: TypeId, name: &str) -> Option<Member> {
        let receiver = types.unalias(receiver);
        if let Some((declaring, element)) = self.find_in_hierarchy(types, receiver, name) {
            return Some(Member { receiver: declaring, element, setter_only: false });
        }
        let setter = format!("{}=", name);
        self.find_in_hierarchy(types, receiver, &setter)
            .map(|(declaring, element)| Member { receiver: declaring, element, setter_only: true })
    }

    fn find_in_hierarchy(&self, types: &TypeContext, receiver: TypeId, key: &str) -> Option<(TypeId, ElementId)> {
        // Superclass chain first
        let mut current = Some(receiver);
        let mut seen = FxHashSet::default();
        while let Some(ty) = current {
            if !seen.insert(ty) {
                break;
            }
            let class = types.class_of(ty)?;
            if let Some(element) = self.local_member(class, key) {
                return Some((ty, element));
            }
            current = types
                .class_info(class)
                .and_then(|info| info.supertype)
                .and_then(|_| types.supertypes(ty).first().copied());
        }

        // Then everything reachable through interfaces
        let mut queue = vec![receiver];
        let mut visited = FxHashSet::default();
        while let Some(ty) = queue.pop() {
            if !visited.insert(ty) {
                continue;
            }
            if let Some(class) = types.class_of(ty) {
                if let Some(element) = self.local_member(class, key) {
                    return Some((ty, element));
                }
            }
            let mut supers = types.supertypes(ty);
            supers.reverse();
            queue.extend(supers);
        }
        None
    }
}

/// Resolution results for one unit
#[derive(Debug, Clone, Default)]
pub struct TreeElements {
    elements: FxHashMap<NodeId, ElementId>,
    types: FxHashMap<NodeId, TypeId>,
}

impl TreeElements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element bound to `node`
    pub fn get(&self, node: NodeId) -> Option<ElementId> {
        self.elements.get(&node).copied()
    }

    /// Type denoted by `node` (annotations, literals, `new`, type literals)
    pub fn type_of(&self, node: NodeId) -> Option<TypeId> {
        self.types.get(&node).copied()
    }

    pub fn bind(&mut self, node: NodeId, element: ElementId) {
        self.elements.insert(node, element);
    }

    pub fn set_type(&mut self, node: NodeId, ty: TypeId) {
        self.types.insert(node, ty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_box(types: &TypeContext) -> (ElementModel, ClassId) {
        let mut model = ElementModel::new();
        let boxed = types.declare_class("Box", &["T"]);
        model.add_class(types, boxed);
        let t = types.class_info(boxed).unwrap().type_params[0];
        let core = *types.core();
        model.add_member(boxed, Element::new("value", ElementKind::Getter, types.simple_function(vec![], t)));
        model.add_member(boxed, Element::new("value", ElementKind::Setter, types.simple_function(vec![t], core.void)));
        model.add_member(boxed, Element::new("label", ElementKind::Setter, types.simple_function(vec![core.string], core.void)));
        (model, boxed)
    }

    #[test]
    fn test_getter_wins_over_setter() {
        let types = TypeContext::new();
        let (model, boxed) = model_with_box(&types);
        let box_of_int = types.interface_type(boxed, vec![types.core().int]);

        let member = model.lookup_member(&types, box_of_int, "value").unwrap();
        assert!(!member.setter_only);
        assert_eq!(member.compute_type(&types, &model), types.core().int);
    }

    #[test]
    fn test_setter_only_member() {
        let types = TypeContext::new();
        let (model, boxed) = model_with_box(&types);
        let raw = types.interface_type(boxed, vec![]);

        let member = model.lookup_member(&types, raw, "label").unwrap();
        assert!(member.setter_only);
        assert_eq!(member.compute_type(&types, &model), types.core().string);
    }

    #[test]
    fn test_inherited_member_is_instantiated() {
        let types = TypeContext::new();
        let (model, boxed) = model_with_box(&types);
        let int_box = types.declare_class("IntBox", &[]);
        types.set_supertype(int_box, types.interface_type(boxed, vec![types.core().int]));

        let member = model.lookup_member(&types, types.this_type(int_box), "value").unwrap();
        assert_eq!(member.compute_type(&types, &model), types.core().int);
        assert!(model.lookup_member(&types, types.this_type(int_box), "missing").is_none());
    }

    #[test]
    fn test_instance_member_classification() {
        let types = TypeContext::new();
        let (model, boxed) = model_with_box(&types);
        let getter = model.local_member(boxed, "value").unwrap();
        assert!(model.get(getter).unwrap().is_instance_member());

        let local = Element::new("x", ElementKind::Variable, types.core().int);
        assert!(!local.is_instance_member());
        assert!(local.is_local());
        assert!(is_unresolved(None));
        assert!(is_unresolved(Some(&Element::new("?", ElementKind::Erroneous, types.core().dynamic))));
    }
}
