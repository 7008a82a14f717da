//! Matching call arguments to parameters

use crate::ast::Argument;
use crate::checker::{Frame, Site, TypeChecker};
use crate::element::ElementId;
use crate::error::{InternalError, MessageKind};
use corvid_types::{FunctionType, TypeId};

/// Where one argument lands in the callee's parameter list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentSlot {
    /// Next required positional parameter
    Required(TypeId),
    /// Next optional positional parameter
    Optional(TypeId),
    /// Declared named parameter
    Named(TypeId),
    /// Named argument the callee does not declare
    UnknownNamed,
    /// Positional argument beyond every positional parameter
    Extra,
}

/// Result of matching a call's arguments against a function type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentPlan {
    /// One slot per argument, in source order
    pub slots: Vec<ArgumentSlot>,
    /// Type of the first required parameter left without an argument
    pub missing: Option<TypeId>,
}

/// Match `arguments` against `function` without looking at argument types
pub fn match_arguments(function: &FunctionType, arguments: &[Argument]) -> ArgumentPlan {
    let mut required = function.params.iter();
    let mut optional = function.optional_params.iter();
    let mut slots = Vec::with_capacity(arguments.len());

    for argument in arguments {
        let slot = match argument {
            Argument::Named(named) => match function.named_parameter_type(&named.name.name) {
                Some(ty) => ArgumentSlot::Named(ty),
                None => ArgumentSlot::UnknownNamed,
            },
            Argument::Positional(_) => {
                if let Some(&ty) = required.next() {
                    ArgumentSlot::Required(ty)
                } else if let Some(&ty) = optional.next() {
                    ArgumentSlot::Optional(ty)
                } else {
                    ArgumentSlot::Extra
                }
            }
        };
        slots.push(slot);
    }

    ArgumentPlan {
        slots,
        missing: required.next().copied(),
    }
}

impl<'a> TypeChecker<'a> {
    /// Check `arguments` against `callee_type`
    ///
    /// Argument types are pushed to `argument_types` in source order when
    /// it is given.
    pub(crate) fn analyze_arguments(
        &mut self,
        site: Site,
        callee: Option<ElementId>,
        callee_type: TypeId,
        arguments: &[Argument],
        mut argument_types: Option<&mut Vec<TypeId>>,
        frame: &Frame,
    ) -> Result<(), InternalError> {
        let unaliased = self.types.unalias(callee_type);
        let function = self
            .types
            .get(unaliased)
            .and_then(|ty| ty.as_function().cloned());

        let function = match function {
            Some(function) => function,
            None => {
                for argument in arguments {
                    let ty = self.analyze(argument.value(), frame)?;
                    if let Some(out) = argument_types.as_deref_mut() {
                        out.push(ty);
                    }
                }
                return Ok(());
            }
        };

        let plan = match_arguments(&function, arguments);
        let mut found_error = false;
        for (argument, slot) in arguments.iter().zip(plan.slots.iter()) {
            let value = argument.value();
            let argument_site = Site { node: value.id(), span: *argument.span() };
            let ty = match *slot {
                ArgumentSlot::UnknownNamed => {
                    let argument_name = match argument {
                        Argument::Named(named) => named.name.name.clone(),
                        Argument::Positional(_) => String::new(),
                    };
                    self.report(argument_site, MessageKind::NamedArgumentNotFound { argument_name });
                    found_error = true;
                    self.analyze(value, frame)?
                }
                ArgumentSlot::Extra => {
                    self.report(argument_site, MessageKind::AdditionalArgument);
                    found_error = true;
                    self.analyze(value, frame)?
                }
                ArgumentSlot::Required(param) | ArgumentSlot::Optional(param) | ArgumentSlot::Named(param) => {
                    let ty = self.analyze(value, frame)?;
                    if !self.check_assignable(argument_site, ty, param) {
                        found_error = true;
                    }
                    ty
                }
            };
            if let Some(out) = argument_types.as_deref_mut() {
                out.push(ty);
            }
        }

        if let Some(missing) = plan.missing {
            let argument_type = self.types.display(missing);
            self.report(site, MessageKind::MissingArgument { argument_type });
            found_error = true;
        }

        if found_error {
            if let Some(callee) = callee {
                self.report_callee(site, callee);
            }
        }
        Ok(())
    }
}
