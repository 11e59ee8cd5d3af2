//! Content stream processor.
//!
//! A [`Processor`] owns the graphics state stack, the graphics-object state
//! machine and the text position, and dispatches each operator to its
//! implementation. Operators are looked up in a private override table
//! first, then in the shared default registry.

use std::collections::HashMap;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::error::Result;
use crate::graphics_state::GraphicsState;
use crate::interpreter_state::InterpreterState;
use crate::operand::{ContentOperation, Operand};
use crate::operator::Operator;
use crate::registry::default_operators;
use crate::resources::Resources;
use crate::text_state::TextPosition;

/// What kind of graphics object is currently being constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphicsObject {
    /// Page description level, nothing open.
    #[default]
    None,
    /// A path is being constructed.
    Path,
    /// A clipping operator was seen; the next painting operator ends it.
    ClippingPath,
    /// Inside `BT`/`ET`.
    Text,
}

impl GraphicsObject {
    pub fn name(&self) -> &'static str {
        match self {
            GraphicsObject::None => "none",
            GraphicsObject::Path => "path",
            GraphicsObject::ClippingPath => "clipping_path",
            GraphicsObject::Text => "text",
        }
    }
}

/// An open `BMC`/`BDC` marked-content sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkedContent {
    pub tag: SmolStr,
    /// Marked content identifier from an inline `BDC` property list.
    pub mcid: Option<i64>,
}

/// Dispatches content stream operators against a graphics state.
pub struct Processor<'r> {
    resources: &'r dyn Resources,
    state: InterpreterState,
    graphics_object: GraphicsObject,
    text_position: TextPosition,
    marked_content: Vec<MarkedContent>,
    compatibility_depth: usize,
    overrides: HashMap<SmolStr, Arc<dyn Operator>>,
}

impl<'r> Processor<'r> {
    pub fn new(resources: &'r dyn Resources) -> Self {
        Self::with_state(resources, InterpreterState::new())
    }

    /// Create a processor starting from an existing state stack.
    pub fn with_state(resources: &'r dyn Resources, state: InterpreterState) -> Self {
        Self {
            resources,
            state,
            graphics_object: GraphicsObject::default(),
            text_position: TextPosition::default(),
            marked_content: Vec::new(),
            compatibility_depth: 0,
            overrides: HashMap::new(),
        }
    }

    pub fn resources(&self) -> &'r dyn Resources {
        self.resources
    }

    /// Install an operator for this processor only, shadowing the default
    /// implementation of the same name. Returns the previous override.
    pub fn set_operator(&mut self, operator: Arc<dyn Operator>) -> Option<Arc<dyn Operator>> {
        self.overrides
            .insert(SmolStr::new(operator.name()), operator)
    }

    /// Drop an override, making the default implementation visible again.
    pub fn remove_operator(&mut self, name: &str) -> Option<Arc<dyn Operator>> {
        self.overrides.remove(name)
    }

    /// The operator currently mapped to `name`.
    pub fn operator(&self, name: &str) -> Option<Arc<dyn Operator>> {
        self.overrides
            .get(name)
            .or_else(|| default_operators().get(name))
            .cloned()
    }

    /// Invoke the operator `name` with `operands`.
    ///
    /// Unknown operators are ignored. Errors from the operator are returned
    /// unchanged.
    pub fn invoke(&mut self, name: &str, operands: &[Operand]) -> Result<()> {
        let Some(operator) = self.operator(name) else {
            if self.compatibility_depth == 0 {
                #[cfg(feature = "tracing")]
                tracing::debug!(operator = name, "ignoring unknown operator");
            }
            return Ok(());
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(operator = name, operands = operands.len(), "invoke");
        operator.invoke(self, operands)
    }

    /// Invoke every operation in order, stopping at the first error.
    pub fn process(&mut self, operations: &[ContentOperation]) -> Result<()> {
        for op in operations {
            self.invoke(&op.name, &op.operands)?;
        }
        Ok(())
    }

    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut InterpreterState {
        &mut self.state
    }

    /// The current (top of stack) graphics state.
    pub fn graphics_state(&self) -> &GraphicsState {
        self.state.graphics_state()
    }

    pub fn graphics_state_mut(&mut self) -> &mut GraphicsState {
        self.state.graphics_state_mut()
    }

    pub fn graphics_object(&self) -> GraphicsObject {
        self.graphics_object
    }

    pub fn set_graphics_object(&mut self, object: GraphicsObject) {
        self.graphics_object = object;
    }

    /// Whether a path (or a clipping path) is currently open.
    pub fn in_path(&self) -> bool {
        matches!(
            self.graphics_object,
            GraphicsObject::Path | GraphicsObject::ClippingPath
        )
    }

    pub fn text_position(&self) -> &TextPosition {
        &self.text_position
    }

    pub fn text_position_mut(&mut self) -> &mut TextPosition {
        &mut self.text_position
    }

    /// Open marked-content sequences, innermost last.
    pub fn marked_content(&self) -> &[MarkedContent] {
        &self.marked_content
    }

    pub(crate) fn begin_marked_content(&mut self, entry: MarkedContent) {
        self.marked_content.push(entry);
    }

    pub(crate) fn end_marked_content(&mut self) -> Option<MarkedContent> {
        self.marked_content.pop()
    }

    /// Nesting depth of `BX`/`EX` compatibility sections.
    pub fn compatibility_depth(&self) -> usize {
        self.compatibility_depth
    }

    pub(crate) fn set_compatibility_depth(&mut self, depth: usize) {
        self.compatibility_depth = depth;
    }
}

impl std::fmt::Debug for Processor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut overrides: Vec<&str> = self.overrides.keys().map(SmolStr::as_str).collect();
        overrides.sort_unstable();
        f.debug_struct("Processor")
            .field("state", &self.state)
            .field("graphics_object", &self.graphics_object)
            .field("text_position", &self.text_position)
            .field("marked_content", &self.marked_content)
            .field("compatibility_depth", &self.compatibility_depth)
            .field("overrides", &overrides)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary;
    use crate::error::ContentError;
    use crate::operator::{ContentOperator, SerializeShape};
    use crate::resources::ResourceDictionary;
    use crate::tokenizer::tokenize;
    use pdfcontent_core::geometry::Matrix;
    use std::sync::Mutex;

    fn run<'a>(resources: &'a ResourceDictionary, content: &[u8]) -> Result<Processor<'a>> {
        let mut processor = Processor::new(resources);
        processor.process(&tokenize(content)?)?;
        Ok(processor)
    }

    #[test]
    fn initial_state() {
        let resources = ResourceDictionary::default();
        let processor = Processor::new(&resources);
        assert_eq!(processor.graphics_object(), GraphicsObject::None);
        assert!(!processor.in_path());
        assert_eq!(processor.state().stack_depth(), 0);
        assert!(processor.text_position().text_matrix.is_identity());
    }

    #[test]
    fn unknown_operator_is_ignored() {
        let resources = ResourceDictionary::default();
        let mut processor = Processor::new(&resources);
        processor.invoke("xyz", &[Operand::Integer(1)]).unwrap();
        assert_eq!(processor.graphics_state(), &GraphicsState::default());
    }

    #[test]
    fn process_stops_at_first_error() {
        let resources = ResourceDictionary::default();
        let mut processor = Processor::new(&resources);
        let ops = tokenize(b"2 w /GS0 gs 5 w").unwrap();
        let err = processor.process(&ops).unwrap_err();
        assert!(matches!(err, ContentError::ResourceNotFound { .. }));
        assert_eq!(processor.graphics_state().line_width, 2.0);
    }

    #[test]
    fn override_shadows_default_and_can_be_removed() {
        let resources = ResourceDictionary::default();
        let mut processor = Processor::new(&resources);
        processor.set_operator(Arc::new(ContentOperator::new(
            "w",
            SerializeShape::SingleNumeric,
            |_, _| Ok(()),
        )));
        processor.invoke("w", &[Operand::Integer(5)]).unwrap();
        assert_eq!(processor.graphics_state().line_width, 1.0);

        assert!(processor.remove_operator("w").is_some());
        processor.invoke("w", &[Operand::Integer(5)]).unwrap();
        assert_eq!(processor.graphics_state().line_width, 5.0);
    }

    #[test]
    fn overrides_are_private_to_a_processor() {
        let resources = ResourceDictionary::default();
        let mut first = Processor::new(&resources);
        first.set_operator(Arc::new(ContentOperator::new(
            "w",
            SerializeShape::SingleNumeric,
            |_, _| Ok(()),
        )));
        let mut second = Processor::new(&resources);
        second.invoke("w", &[Operand::Integer(3)]).unwrap();
        assert_eq!(second.graphics_state().line_width, 3.0);
    }

    #[test]
    fn cm_twice_composes_exactly() {
        let resources = ResourceDictionary::default();
        let processor = run(&resources, b"1 2 3 4 5 6 cm 6 5 4 3 2 1 cm").unwrap();
        assert_eq!(
            processor.graphics_state().ctm,
            Matrix::new(21.0, 32.0, 13.0, 20.0, 10.0, 14.0)
        );
    }

    #[test]
    fn q_and_q_restore_line_width() {
        let resources = ResourceDictionary::default();
        let processor = run(&resources, b"3 w q 9 w Q").unwrap();
        assert_eq!(processor.graphics_state().line_width, 3.0);
    }

    #[test]
    fn extra_restore_is_a_no_op() {
        let resources = ResourceDictionary::default();
        let processor = run(&resources, b"4 w Q Q").unwrap();
        assert_eq!(processor.graphics_state().line_width, 4.0);
        assert_eq!(processor.state().stack_depth(), 0);
    }

    #[test]
    fn text_position_is_not_saved_by_q() {
        let resources = ResourceDictionary::default();
        let processor = run(&resources, b"BT q 10 20 Td Q").unwrap();
        assert_eq!(
            processor.text_position().line_matrix,
            Matrix::translation(10.0, 20.0)
        );
    }

    #[test]
    fn path_painting_closes_path() {
        let resources = ResourceDictionary::default();
        for painter in ["S", "s", "f", "F", "f*", "B", "B*", "b", "b*", "n"] {
            let mut processor = Processor::new(&resources);
            processor.set_graphics_object(GraphicsObject::Path);
            processor.invoke(painter, &[]).unwrap();
            assert_eq!(processor.graphics_object(), GraphicsObject::None, "{painter}");
        }
    }

    #[test]
    fn clipping_from_any_state() {
        let resources = ResourceDictionary::default();
        for clip in ["W", "W*"] {
            for start in [
                GraphicsObject::None,
                GraphicsObject::Path,
                GraphicsObject::ClippingPath,
                GraphicsObject::Text,
            ] {
                let mut processor = Processor::new(&resources);
                processor.set_graphics_object(start);
                processor.invoke(clip, &[]).unwrap();
                assert_eq!(processor.graphics_object(), GraphicsObject::ClippingPath);
                assert!(processor.in_path());
            }
        }
    }

    #[test]
    fn path_construction_opens_path() {
        let resources = ResourceDictionary::default();
        let processor = run(&resources, b"10 10 m").unwrap();
        assert_eq!(processor.graphics_object(), GraphicsObject::Path);
        let processor = run(&resources, b"0 0 10 10 re").unwrap();
        assert_eq!(processor.graphics_object(), GraphicsObject::Path);
        let processor = run(&resources, b"0 0 m 5 5 l 1 2 3 4 5 6 c 1 2 3 4 v 1 2 3 4 y h").unwrap();
        assert_eq!(processor.graphics_object(), GraphicsObject::Path);
    }

    #[test]
    fn text_object_transitions() {
        let resources = ResourceDictionary::default();
        let mut processor = Processor::new(&resources);
        processor.invoke("BT", &[]).unwrap();
        assert_eq!(processor.graphics_object(), GraphicsObject::Text);
        assert!(!processor.in_path());
        processor.invoke("ET", &[]).unwrap();
        assert_eq!(processor.graphics_object(), GraphicsObject::None);
    }

    #[test]
    fn marked_content_stack() {
        let resources = ResourceDictionary::default();
        let mut processor = Processor::new(&resources);
        processor
            .invoke(
                "BDC",
                &[Operand::name("Span"), Operand::Dictionary(dictionary! { "MCID" => 4 })],
            )
            .unwrap();
        processor.invoke("BMC", &[Operand::name("Artifact")]).unwrap();
        assert_eq!(processor.marked_content().len(), 2);
        assert_eq!(processor.marked_content()[0].mcid, Some(4));
        processor.invoke("EMC", &[]).unwrap();
        processor.invoke("EMC", &[]).unwrap();
        processor.invoke("EMC", &[]).unwrap();
        assert!(processor.marked_content().is_empty());
    }

    #[test]
    fn compatibility_sections_nest() {
        let resources = ResourceDictionary::default();
        let processor = run(&resources, b"BX BX foo EX").unwrap();
        assert_eq!(processor.compatibility_depth(), 1);
        let processor = run(&resources, b"EX").unwrap();
        assert_eq!(processor.compatibility_depth(), 0);
    }

    #[test]
    fn composite_sees_live_override() {
        let resources = ResourceDictionary::default();
        let calls: Arc<Mutex<Vec<String>>> = Arc::default();
        let mut processor = Processor::new(&resources);
        let recorder = Arc::clone(&calls);
        processor.set_operator(Arc::new(ContentOperator::new(
            "Td",
            SerializeShape::Generic,
            move |_, operands| {
                recorder
                    .lock()
                    .unwrap()
                    .push(format!("Td {:?}", operands));
                Ok(())
            },
        )));
        processor.invoke("T*", &[]).unwrap();
        assert_eq!(calls.lock().unwrap().len(), 1);
        assert!(processor.text_position().line_matrix.is_identity());
    }

    #[test]
    fn debug_lists_overrides() {
        let resources = ResourceDictionary::default();
        let mut processor = Processor::new(&resources);
        processor.set_operator(Arc::new(ContentOperator::new(
            "Tj",
            SerializeShape::Generic,
            |_, _| Ok(()),
        )));
        assert!(format!("{processor:?}").contains("\"Tj\""));
    }
}
