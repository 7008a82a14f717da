//! Unit driver
//!
//! A unit is one resolved function, method, constructor or field
//! initializer. Units share the read-only [`TypeContext`] and
//! [`ElementModel`]; each gets its own visitor, so units can be checked on
//! any number of threads.

use crate::ast::{Expression, FunctionExpression};
use crate::checker::{NodeTypes, TypeChecker};
use crate::config::CheckerConfig;
use crate::element::{ElementId, ElementModel, TreeElements};
use crate::error::{InternalError, InternalErrorKind, TypeWarning};
use corvid_types::TypeContext;
use crossbeam::channel;
use parking_lot::Mutex;

/// Body of a unit
#[derive(Debug, Clone, PartialEq)]
pub enum UnitBody {
    /// Function, method or constructor
    Function(FunctionExpression),
    /// Field initializer
    Field(Expression),
}

/// One resolved declaration to check
#[derive(Debug, Clone)]
pub struct CheckUnit {
    /// The declared element
    pub element: ElementId,
    pub body: UnitBody,
    /// Resolution results for `body`
    pub elements: TreeElements,
}

/// Result of checking one unit
#[derive(Debug, Clone, PartialEq)]
pub struct UnitReport {
    pub element: ElementId,
    /// Diagnostics in visitation order
    pub warnings: Vec<TypeWarning>,
    pub node_types: NodeTypes,
}

impl UnitReport {
    /// Number of warnings, excluding info pointers
    pub fn warning_count(&self) -> usize {
        self.warnings.iter().filter(|w| !w.is_info()).count()
    }
}

/// Checks units against a shared type context and element model
pub struct TypeCheckerTask<'a> {
    types: &'a TypeContext,
    model: &'a ElementModel,
    config: CheckerConfig,
}

impl<'a> TypeCheckerTask<'a> {
    pub fn new(types: &'a TypeContext, model: &'a ElementModel) -> Self {
        Self::with_config(types, model, CheckerConfig::default())
    }

    pub fn with_config(types: &'a TypeContext, model: &'a ElementModel, config: CheckerConfig) -> Self {
        TypeCheckerTask { types, model, config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check one unit with a fresh visitor
    pub fn check(&self, unit: &CheckUnit) -> Result<UnitReport, InternalError> {
        let element = self
            .model
            .get(unit.element)
            .ok_or_else(|| InternalError::new(InternalErrorKind::UnknownElement { id: unit.element.0 }))?;
        tracing::debug!(element = %element.name, "checking unit");

        let mut checker = TypeChecker::new(self.types, self.model, &unit.elements)
            .with_config(&self.config)
            .with_current_class(element.enclosing_class);

        let result = match &unit.body {
            UnitBody::Function(function) => checker.check_function(function),
            UnitBody::Field(initializer) => checker.check_field_initializer(unit.element, initializer),
        };
        if let Err(error) = result {
            tracing::warn!(element = %element.name, error = %error, "unit aborted");
            return Err(error);
        }

        let (warnings, node_types) = checker.into_parts();
        tracing::debug!(element = %element.name, warnings = warnings.len(), "unit checked");
        Ok(UnitReport { element: unit.element, warnings, node_types })
    }

    /// Check every unit, returning results in unit order
    ///
    /// An internal error in one unit does not affect the others.
    pub fn check_all(&self, units: &[CheckUnit]) -> Vec<Result<UnitReport, InternalError>> {
        let workers = self.config.worker_count(units.len());
        if workers <= 1 {
            return units.iter().map(|unit| self.check(unit)).collect();
        }
        tracing::debug!(units = units.len(), workers, "checking units in parallel");

        let (sender, receiver) = channel::unbounded();
        for index in 0..units.len() {
            // The receiver is alive until the scope below ends
            let _ = sender.send(index);
        }
        drop(sender);

        let slots: Mutex<Vec<Option<Result<UnitReport, InternalError>>>> =
            Mutex::new((0..units.len()).map(|_| None).collect());

        let outcome = crossbeam::scope(|scope| {
            for _ in 0..workers {
                let receiver = receiver.clone();
                let slots = &slots;
                scope.spawn(move |_| {
                    for index in receiver.iter() {
                        let result = self.check(&units[index]);
                        slots.lock()[index] = Some(result);
                    }
                });
            }
        });
        if let Err(panic) = outcome {
            std::panic::resume_unwind(panic);
        }

        slots
            .into_inner()
            .into_iter()
            .zip(units)
            .map(|(slot, unit)| {
                slot.unwrap_or_else(|| Err(InternalError::new(InternalErrorKind::UnknownElement { id: unit.element.0 })))
            })
            .collect()
    }
}
