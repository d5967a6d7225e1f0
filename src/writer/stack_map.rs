use crate::class_file::{
    ConstantPool, RawFrame, StackMap, StackMapFrame, StackMapTable, VerificationTypeInfo,
};
use crate::descriptors::{BaseType, RenderDescriptor};
use crate::errors::Error;
use crate::model::{Class, FrameSnapshot, Method, Type, VerificationType};
use crate::names::{Name, UnqualifiedName};
use crate::writer::InnerClassCollector;

/// Largest difference in locals count that `chop_frame`/`append_frame` can
/// express; anything bigger falls back to `full_frame`
pub const MAX_LOCAL_LENGTH_DIFF: usize = 3;

/// Locals in effect at method entry, derived from the receiver and the
/// declared parameters
///
/// In a constructor the receiver starts out as `uninitializedThis` (except in
/// `java/lang/Object` itself, whose constructor has nothing left to
/// initialize).
pub fn initial_locals(class: &Class, method: &Method) -> Vec<VerificationType> {
    let mut locals = vec![];
    if !method.is_static() {
        let receiver_uninitialized =
            method.name == UnqualifiedName::INIT && class.symbol.name.as_str() != "java/lang/Object";
        if receiver_uninitialized {
            locals.push(VerificationType::UninitializedThis);
        } else {
            locals.push(VerificationType::Object(Type::class(class.symbol.clone())));
        }
    }
    for parameter in &method.parameters {
        locals.push(parameter_verification_type(&parameter.parameter_type));
    }
    locals
}

fn parameter_verification_type(ty: &Type) -> VerificationType {
    match ty {
        Type::Base(BaseType::Float) => VerificationType::Float,
        Type::Base(BaseType::Long) => VerificationType::Long,
        Type::Base(BaseType::Double) => VerificationType::Double,
        // boolean, byte, char, short, int all verify as int
        Type::Base(_) => VerificationType::Integer,
        other => VerificationType::Object(other.clone()),
    }
}

/// Resolve a model verification type down to pool indices
pub fn lower_verification_type(
    pool: &mut ConstantPool,
    inner_classes: &mut InnerClassCollector,
    verification_type: &VerificationType,
) -> Result<VerificationTypeInfo, Error> {
    Ok(match verification_type {
        VerificationType::Top => VerificationTypeInfo::Top,
        VerificationType::Integer => VerificationTypeInfo::Integer,
        VerificationType::Float => VerificationTypeInfo::Float,
        VerificationType::Long => VerificationTypeInfo::Long,
        VerificationType::Double => VerificationTypeInfo::Double,
        VerificationType::Null => VerificationTypeInfo::Null,
        VerificationType::UninitializedThis => VerificationTypeInfo::UninitializedThis,
        VerificationType::Object(ty) => {
            inner_classes.enter_type(ty);
            let erased = ty.erased();
            let class_name = match erased.as_class_name() {
                Some(name) => name,
                None => erased.render(),
            };
            VerificationTypeInfo::Object(pool.get_class(&class_name)?)
        }
        VerificationType::Uninitialized(offset) => VerificationTypeInfo::Uninitialized(*offset),
    })
}

/// Build a compressed `StackMapTable` from frame snapshots
///
/// Snapshots must be in strictly increasing `pc` order. The offset delta of
/// the first frame is its `pc`; every later frame records `pc` minus the
/// previous frame's `pc` minus one.
pub fn compressed_table(
    pool: &mut ConstantPool,
    inner_classes: &mut InnerClassCollector,
    initial_locals: &[VerificationType],
    frames: &[FrameSnapshot],
) -> Result<StackMapTable, Error> {
    let mut previous_locals = lower_all(pool, inner_classes, initial_locals)?;
    let mut previous_pc: Option<u16> = None;

    let mut table = Vec::with_capacity(frames.len());
    for frame in frames {
        debug_assert!(
            previous_pc.map_or(true, |pc| frame.pc > pc),
            "frame offsets must be strictly increasing",
        );
        let offset_delta = match previous_pc {
            None => frame.pc,
            Some(pc) => frame.pc - pc - 1,
        };
        let locals = lower_all(pool, inner_classes, &frame.locals)?;
        let stack = lower_all(pool, inner_classes, &frame.stack)?;

        table.push(compress(offset_delta, &previous_locals, locals.clone(), stack));
        previous_locals = locals;
        previous_pc = Some(frame.pc);
    }
    Ok(StackMapTable(table))
}

/// Build the uncompressed `StackMap` attribute used before major version 50
///
/// Offsets are absolute and every frame is written in full.
pub fn legacy_table(
    pool: &mut ConstantPool,
    inner_classes: &mut InnerClassCollector,
    frames: &[FrameSnapshot],
) -> Result<StackMap, Error> {
    let mut table = Vec::with_capacity(frames.len());
    for frame in frames {
        table.push(RawFrame {
            offset: frame.pc,
            locals: lower_all(pool, inner_classes, &frame.locals)?,
            stack: lower_all(pool, inner_classes, &frame.stack)?,
        });
    }
    Ok(StackMap(table))
}

fn lower_all(
    pool: &mut ConstantPool,
    inner_classes: &mut InnerClassCollector,
    types: &[VerificationType],
) -> Result<Vec<VerificationTypeInfo>, Error> {
    types
        .iter()
        .map(|ty| lower_verification_type(pool, inner_classes, ty))
        .collect()
}

/// Pick the smallest frame form that can express the transition
///
/// Preference order: `same_locals_1_stack_item`, `same_frame`, `chop_frame`,
/// `append_frame`, `full_frame`. The first two groups are distinguished by
/// stack depth, so no transition matches more than one of them.
fn compress(
    offset_delta: u16,
    previous_locals: &[VerificationTypeInfo],
    locals: Vec<VerificationTypeInfo>,
    stack: Vec<VerificationTypeInfo>,
) -> StackMapFrame {
    match stack.len() {
        0 => {
            if locals.len() <= previous_locals.len() {
                let chopped = previous_locals.len() - locals.len();
                if chopped <= MAX_LOCAL_LENGTH_DIFF
                    && locals[..] == previous_locals[..locals.len()]
                {
                    if chopped == 0 {
                        return StackMapFrame::SameLocalsNoStack { offset_delta };
                    } else {
                        return StackMapFrame::ChopLocalsNoStack {
                            offset_delta,
                            chopped_k: chopped as u8,
                        };
                    }
                }
            } else {
                let added = locals.len() - previous_locals.len();
                if added <= MAX_LOCAL_LENGTH_DIFF
                    && locals[..previous_locals.len()] == previous_locals[..]
                {
                    return StackMapFrame::AppendLocalsNoStack {
                        offset_delta,
                        locals: locals[previous_locals.len()..].to_vec(),
                    };
                }
            }
        }
        1 if locals[..] == previous_locals[..] => {
            let mut stack = stack;
            return StackMapFrame::SameLocalsOneStack {
                offset_delta,
                stack: stack.pop().expect("stack has one entry"),
            };
        }
        _ => (),
    }

    StackMapFrame::Full {
        offset_delta,
        locals,
        stack,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::VerificationType as VT;

    fn table(initial: &[VT], frames: &[FrameSnapshot]) -> StackMapTable {
        let mut pool = ConstantPool::new();
        let mut inner_classes = InnerClassCollector::new();
        compressed_table(&mut pool, &mut inner_classes, initial, frames).unwrap()
    }

    fn snapshot(pc: u16, locals: Vec<VT>, stack: Vec<VT>) -> FrameSnapshot {
        FrameSnapshot { pc, locals, stack }
    }

    #[test]
    fn unchanged_locals_become_same_frame() {
        let initial = vec![VT::Integer, VT::Long];
        let frames = vec![snapshot(10, vec![VT::Integer, VT::Long], vec![])];
        assert_eq!(
            table(&initial, &frames).0,
            vec![StackMapFrame::SameLocalsNoStack { offset_delta: 10 }]
        );
    }

    #[test]
    fn one_stack_item_beats_full_frame() {
        let initial = vec![VT::Integer];
        let frames = vec![snapshot(4, vec![VT::Integer], vec![VT::Float])];
        assert_eq!(
            table(&initial, &frames).0,
            vec![StackMapFrame::SameLocalsOneStack {
                offset_delta: 4,
                stack: VerificationTypeInfo::Float,
            }]
        );
    }

    #[test]
    fn append_up_to_three_locals() {
        let initial = vec![VT::Integer];
        let frames = vec![snapshot(
            7,
            vec![VT::Integer, VT::Float, VT::Float, VT::Float],
            vec![],
        )];
        assert_eq!(
            table(&initial, &frames).0,
            vec![StackMapFrame::AppendLocalsNoStack {
                offset_delta: 7,
                locals: vec![
                    VerificationTypeInfo::Float,
                    VerificationTypeInfo::Float,
                    VerificationTypeInfo::Float,
                ],
            }]
        );
    }

    #[test]
    fn four_added_locals_force_full_frame() {
        let initial = vec![VT::Integer];
        let frames = vec![snapshot(
            7,
            vec![VT::Integer, VT::Float, VT::Float, VT::Float, VT::Float],
            vec![],
        )];
        match &table(&initial, &frames).0[0] {
            StackMapFrame::Full { locals, stack, .. } => {
                assert_eq!(locals.len(), 5);
                assert!(stack.is_empty());
            }
            other => panic!("expected full frame, got {:?}", other),
        }
    }

    #[test]
    fn chop_requires_prefix_match() {
        let initial = vec![VT::Integer, VT::Float, VT::Long];
        let chopped = vec![snapshot(3, vec![VT::Integer, VT::Float], vec![])];
        assert_eq!(
            table(&initial, &chopped).0,
            vec![StackMapFrame::ChopLocalsNoStack {
                offset_delta: 3,
                chopped_k: 1,
            }]
        );

        // Shorter but not a prefix: must be a full frame
        let mismatched = vec![snapshot(3, vec![VT::Integer, VT::Long], vec![])];
        match &table(&initial, &mismatched).0[0] {
            StackMapFrame::Full { .. } => (),
            other => panic!("expected full frame, got {:?}", other),
        }
    }

    #[test]
    fn offset_deltas_skip_one_after_the_first() {
        let initial = vec![VT::Integer];
        let frames = vec![
            snapshot(10, vec![VT::Integer], vec![]),
            snapshot(25, vec![VT::Integer], vec![]),
        ];
        assert_eq!(
            table(&initial, &frames).0,
            vec![
                StackMapFrame::SameLocalsNoStack { offset_delta: 10 },
                StackMapFrame::SameLocalsNoStack { offset_delta: 14 },
            ]
        );
    }

    #[test]
    fn legacy_frames_keep_absolute_offsets() {
        let mut pool = ConstantPool::new();
        let mut inner_classes = InnerClassCollector::new();
        let frames = vec![
            snapshot(10, vec![VT::Integer], vec![]),
            snapshot(25, vec![VT::Integer], vec![VT::Null]),
        ];
        let legacy = legacy_table(&mut pool, &mut inner_classes, &frames).unwrap();
        assert_eq!(legacy.0[0].offset, 10);
        assert_eq!(legacy.0[1].offset, 25);
        assert_eq!(legacy.0[1].stack, vec![VerificationTypeInfo::Null]);
    }
}
