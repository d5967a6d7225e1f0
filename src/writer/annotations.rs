use crate::class_file::{
    AnnotationInfo, Attribute, ConstantPool, ElementValueInfo, ElementValuePair,
    RuntimeInvisibleAnnotations, RuntimeInvisibleParameterAnnotations,
    RuntimeInvisibleTypeAnnotations, RuntimeVisibleAnnotations,
    RuntimeVisibleParameterAnnotations, RuntimeVisibleTypeAnnotations, TargetInfo,
    TypeAnnotationInfo,
};
use crate::descriptors::RenderDescriptor;
use crate::errors::Error;
use crate::model::{Annotation, ClassSymbol, ElementValue, Parameter, Retention, TypeAnnotation};
use crate::names::Name;
use crate::writer::InnerClassCollector;

/// What kind of declaration the annotations being lowered hang off of
///
/// Used to repair type annotations whose target position was lost upstream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnnotatedContext {
    Class,
    Field,
    Method,
    Code,
}

/// Resolve one annotation down to constant pool indices
pub fn lower_annotation(
    pool: &mut ConstantPool,
    inner_classes: &mut InnerClassCollector,
    annotation: &Annotation,
) -> Result<AnnotationInfo, Error> {
    inner_classes.enter(&annotation.annotation_type);
    let type_descriptor = pool.get_utf8(class_descriptor(&annotation.annotation_type))?;

    let mut element_value_pairs = Vec::with_capacity(annotation.values.len());
    for (name, value) in &annotation.values {
        element_value_pairs.push(ElementValuePair {
            element_name: pool.get_utf8(name.as_str())?,
            value: lower_element_value(pool, inner_classes, value)?,
        });
    }

    Ok(AnnotationInfo {
        type_descriptor,
        element_value_pairs,
    })
}

pub fn lower_element_value(
    pool: &mut ConstantPool,
    inner_classes: &mut InnerClassCollector,
    value: &ElementValue,
) -> Result<ElementValueInfo, Error> {
    Ok(match value {
        ElementValue::Boolean(value) => ElementValueInfo::Boolean(pool.get_integer(*value as i32)?),
        ElementValue::Byte(value) => ElementValueInfo::Byte(pool.get_integer(*value as i32)?),
        ElementValue::Char(value) => ElementValueInfo::Char(pool.get_integer(*value as i32)?),
        ElementValue::Short(value) => ElementValueInfo::Short(pool.get_integer(*value as i32)?),
        ElementValue::Int(value) => ElementValueInfo::Int(pool.get_integer(*value)?),
        ElementValue::Long(value) => ElementValueInfo::Long(pool.get_long(*value)?),
        ElementValue::Float(value) => ElementValueInfo::Float(pool.get_float(*value)?),
        ElementValue::Double(value) => ElementValueInfo::Double(pool.get_double(*value)?),

        // String values point straight at a Utf8 entry, not a CONSTANT_String
        ElementValue::String(value) => ElementValueInfo::String(pool.get_utf8(value.as_str())?),

        ElementValue::EnumConstant {
            enum_type,
            constant,
        } => {
            inner_classes.enter(enum_type);
            ElementValueInfo::Enum {
                type_name: pool.get_utf8(class_descriptor(enum_type))?,
                const_name: pool.get_utf8(constant.as_str())?,
            }
        }

        ElementValue::Class(ty) => {
            inner_classes.enter_type(ty);
            ElementValueInfo::Class(pool.get_utf8(ty.erased().render())?)
        }

        ElementValue::Annotation(nested) => {
            ElementValueInfo::Annotation(lower_annotation(pool, inner_classes, nested)?)
        }

        ElementValue::Array(values) => ElementValueInfo::Array(
            values
                .iter()
                .map(|value| lower_element_value(pool, inner_classes, value))
                .collect::<Result<Vec<_>, Error>>()?,
        ),
    })
}

fn class_descriptor(symbol: &ClassSymbol) -> String {
    format!("L{};", symbol.name.as_str())
}

/// `RuntimeVisibleAnnotations` and `RuntimeInvisibleAnnotations`, each emitted
/// only when it would be non-empty
pub fn annotation_attributes(
    pool: &mut ConstantPool,
    inner_classes: &mut InnerClassCollector,
    annotations: &[Annotation],
) -> Result<Vec<Attribute>, Error> {
    let mut visible = vec![];
    let mut invisible = vec![];
    for annotation in annotations {
        let lowered = lower_annotation(pool, inner_classes, annotation)?;
        match annotation.retention {
            Retention::Runtime => visible.push(lowered),
            Retention::Class => invisible.push(lowered),
        }
    }

    let mut attributes = vec![];
    if !visible.is_empty() {
        attributes.push(pool.get_attribute(RuntimeVisibleAnnotations(visible))?);
    }
    if !invisible.is_empty() {
        attributes.push(pool.get_attribute(RuntimeInvisibleAnnotations(invisible))?);
    }
    Ok(attributes)
}

/// `RuntimeVisibleParameterAnnotations` and its invisible twin
///
/// When any parameter carries an annotation of one retention, the attribute
/// covers every parameter (unannotated ones get an empty list).
pub fn parameter_annotation_attributes(
    pool: &mut ConstantPool,
    inner_classes: &mut InnerClassCollector,
    parameters: &[Parameter],
) -> Result<Vec<Attribute>, Error> {
    let mut visible: Vec<Vec<AnnotationInfo>> = vec![];
    let mut invisible: Vec<Vec<AnnotationInfo>> = vec![];
    let mut any_visible = false;
    let mut any_invisible = false;

    for parameter in parameters {
        let mut visible_here = vec![];
        let mut invisible_here = vec![];
        for annotation in &parameter.annotations {
            let lowered = lower_annotation(pool, inner_classes, annotation)?;
            match annotation.retention {
                Retention::Runtime => visible_here.push(lowered),
                Retention::Class => invisible_here.push(lowered),
            }
        }
        any_visible |= !visible_here.is_empty();
        any_invisible |= !invisible_here.is_empty();
        visible.push(visible_here);
        invisible.push(invisible_here);
    }

    let mut attributes = vec![];
    if any_visible {
        attributes.push(pool.get_attribute(RuntimeVisibleParameterAnnotations(visible))?);
    }
    if any_invisible {
        attributes.push(pool.get_attribute(RuntimeInvisibleParameterAnnotations(invisible))?);
    }
    Ok(attributes)
}

/// `RuntimeVisibleTypeAnnotations` and `RuntimeInvisibleTypeAnnotations`
///
/// Annotations with an unresolved target get one repair attempt from the
/// declaration context. If the context cannot pin down a position either, the
/// annotation is dropped with an error log rather than corrupting the
/// attribute.
pub fn type_annotation_attributes(
    pool: &mut ConstantPool,
    inner_classes: &mut InnerClassCollector,
    context: AnnotatedContext,
    type_annotations: &[TypeAnnotation],
) -> Result<Vec<Attribute>, Error> {
    let mut visible = vec![];
    let mut invisible = vec![];
    for type_annotation in type_annotations {
        let target = match &type_annotation.target {
            Some(target) => target.clone(),
            None => match repaired_target(context) {
                Some(target) => target,
                None => {
                    log::error!(
                        "dropping type annotation {} with unresolved target position",
                        type_annotation.annotation.annotation_type.name.as_str()
                    );
                    continue;
                }
            },
        };
        let lowered = TypeAnnotationInfo {
            target,
            path: type_annotation.path.clone(),
            annotation: lower_annotation(pool, inner_classes, &type_annotation.annotation)?,
        };
        match type_annotation.annotation.retention {
            Retention::Runtime => visible.push(lowered),
            Retention::Class => invisible.push(lowered),
        }
    }

    let mut attributes = vec![];
    if !visible.is_empty() {
        attributes.push(pool.get_attribute(RuntimeVisibleTypeAnnotations(visible))?);
    }
    if !invisible.is_empty() {
        attributes.push(pool.get_attribute(RuntimeInvisibleTypeAnnotations(invisible))?);
    }
    Ok(attributes)
}

/// Best-guess target for an annotation whose position was lost
///
/// Inside a method body no guess is safe, so `Code` contexts yield `None`.
fn repaired_target(context: AnnotatedContext) -> Option<TargetInfo> {
    match context {
        AnnotatedContext::Class => Some(TargetInfo::ClassExtends(65535)),
        AnnotatedContext::Field => Some(TargetInfo::Field),
        AnnotatedContext::Method => Some(TargetInfo::MethodReturn),
        AnnotatedContext::Code => None,
    }
}
