use std::{fmt, panic::Location, time::Instant};

use crate::{
    Testit,
    assertion::Assertion,
    error::ChainError,
    outcome::Status,
    panic::BodyResult,
    trace::{self, Origin},
    tree::NodeId,
    value::Value,
};

/// One step of a fluent chain.
///
/// A view points at the node the previous call produced and carries the
/// configuration collected along the chain. Each call returns a new view;
/// fields a call does not set are copied forward unchanged, so a view made
/// with [`time`](Self::time) keeps timing every test declared from it and
/// everything after it.
///
/// The operations that only decorate a node ([`comment`](Self::comment),
/// [`callback`](Self::callback), [`add_trace`](Self::add_trace)) need a
/// current node and fail with [`ChainError::MissingNode`] on a root view.
#[derive(Clone)]
pub struct ChainView<'e> {
    engine: &'e Testit,
    node: Option<NodeId>,
    trace: Option<Origin>,
    timestamp: Option<Instant>,
    excluded: bool,
}

impl fmt::Debug for ChainView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainView")
            .field("node", &self.node)
            .field("trace", &self.trace)
            .field("timestamp", &self.timestamp)
            .field("excluded", &self.excluded)
            .finish_non_exhaustive()
    }
}

impl<'e> ChainView<'e> {
    pub(crate) fn new(engine: &'e Testit) -> Self {
        Self {
            engine,
            node: None,
            trace: None,
            timestamp: None,
            excluded: false,
        }
    }

    /// A view on `node` with a trace taken at `location`.
    fn derive(&self, node: NodeId, location: &'static Location<'static>) -> Self {
        Self {
            engine: self.engine,
            node: Some(node),
            trace: Some(self.engine.view_trace(location)),
            timestamp: self.timestamp,
            excluded: self.excluded,
        }
    }

    fn require(&self, operation: &'static str) -> Result<NodeId, ChainError> {
        self.node.ok_or(ChainError::MissingNode { operation })
    }

    pub fn engine(&self) -> &'e Testit {
        self.engine
    }

    /// The node this view refers to.
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// The trace taken where this view was made, rendered on each call.
    pub fn trace(&self) -> Option<String> {
        let filter = self.engine.trace_filter();
        self.trace.as_ref().map(|origin| origin.render(filter))
    }

    pub fn is_timed(&self) -> bool {
        self.timestamp.is_some()
    }

    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// Declare the group `name` and run `body` inside it.
    ///
    /// Declaring a name that already exists at this level re-enters that
    /// group: new children are appended and its time accumulates. A body
    /// that returns an error or panics marks the group as errored; the
    /// failure stops there. A body that only diverges must name its return
    /// type, see [`BodyResult`].
    #[track_caller]
    pub fn group<F, R>(&self, name: &str, body: F) -> ChainView<'e>
    where
        F: FnOnce() -> R,
        R: Into<BodyResult>,
    {
        let location = Location::caller();
        let container = self.engine.container(self.node);
        let node = self.engine.make_group(container, name, body, self.excluded);
        self.derive(node, location)
    }

    /// Refer to an existing group without running anything.
    #[track_caller]
    pub fn group_named(&self, name: &str) -> Result<ChainView<'e>, ChainError> {
        let location = Location::caller();
        let container = self.engine.container(self.node);
        let node = self.engine.lookup_group(container, name)?;
        Ok(self.derive(node, location))
    }

    #[track_caller]
    pub fn assert(&self, assertion: Assertion, args: Vec<Value>) -> ChainView<'e> {
        let location = Location::caller();
        let container = self.engine.container(self.node);
        let node = self.engine.make_test(
            container,
            assertion,
            args,
            self.timestamp,
            self.excluded,
        );
        self.derive(node, location)
    }

    /// One truthy argument, or two arguments of the same kind that are deeply equal.
    #[track_caller]
    pub fn it(&self, args: Vec<Value>) -> ChainView<'e> {
        self.assert(Assertion::It, args)
    }

    /// A single array whose elements are all truthy.
    #[track_caller]
    pub fn them(&self, args: Vec<Value>) -> ChainView<'e> {
        self.assert(Assertion::Them, args)
    }

    /// A value and the kind tag it should classify as.
    #[track_caller]
    pub fn is_type(&self, args: Vec<Value>) -> ChainView<'e> {
        self.assert(Assertion::Type, args)
    }

    /// An array whose elements share one kind, optionally the given one.
    #[track_caller]
    pub fn types(&self, args: Vec<Value>) -> ChainView<'e> {
        self.assert(Assertion::Types, args)
    }

    pub fn comment(self, text: impl Into<String>) -> Result<Self, ChainError> {
        let node = self.require("comment")?;
        self.engine.tree_mut().set_comment(node, text.into());
        Ok(self)
    }

    /// Run the callback matching the current node's status.
    ///
    /// Callbacks run outside of any containment: if one panics, the panic
    /// reaches the caller.
    pub fn callback(self, callbacks: Callbacks<'_>) -> Result<Self, ChainError> {
        let node = self.require("callback")?;
        let status = self.engine.tree().node(node).status();
        let callback = match status {
            Some(Status::Pass) => callbacks.on_pass,
            Some(Status::Fail) => callbacks.on_fail,
            Some(Status::Error) => callbacks.on_error,
            None => None,
        };
        if let Some(callback) = callback {
            callback();
        }
        Ok(self)
    }

    /// Store this view's trace on the current node, keeping `depth` lines
    /// below the first if given.
    pub fn add_trace(self, depth: Option<usize>) -> Result<Self, ChainError> {
        let node = self.require("add_trace")?;
        if let Some(view_trace) = self.trace() {
            let stored = match depth {
                Some(depth) => trace::truncate(&view_trace, depth),
                None => view_trace,
            };
            self.engine.tree_mut().set_trace(node, stored);
        }
        Ok(self)
    }

    /// Time every test declared from the returned view.
    pub fn time(&self) -> ChainView<'e> {
        Self {
            timestamp: Some(Instant::now()),
            ..self.clone()
        }
    }

    /// Keep declarations made from the returned view out of their parent's children.
    pub fn exclude(&self) -> ChainView<'e> {
        Self {
            excluded: true,
            ..self.clone()
        }
    }

    /// Whether the current node passed, or `None` on a root view.
    pub fn result(&self) -> Option<bool> {
        let node = self.node?;
        Some(self.engine.tree().node(node).status() == Some(Status::Pass))
    }

    /// The arguments captured by the current test.
    ///
    /// A single argument is returned as is, several as an array. Groups and
    /// tests without arguments have none.
    pub fn arguments(&self) -> Option<Value> {
        let node = self.node?;
        let tree = self.engine.tree();
        match tree.test(node)?.arguments() {
            [] => None,
            [single] => Some(single.clone()),
            all => Some(Value::array(all.to_vec())),
        }
    }

    /// Report the current node, or the whole tree on a root view.
    pub fn done(&self) {
        self.engine.finalize(self.node)
    }
}

type Callback<'c> = Box<dyn FnOnce() + 'c>;

/// Functions to run depending on a node's status.
#[derive(Default)]
pub struct Callbacks<'c> {
    on_pass: Option<Callback<'c>>,
    on_fail: Option<Callback<'c>>,
    on_error: Option<Callback<'c>>,
}

impl<'c> Callbacks<'c> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_pass(self, on_pass: impl FnOnce() + 'c) -> Self {
        Self {
            on_pass: Some(Box::new(on_pass)),
            ..self
        }
    }

    pub fn on_fail(self, on_fail: impl FnOnce() + 'c) -> Self {
        Self {
            on_fail: Some(Box::new(on_fail)),
            ..self
        }
    }

    pub fn on_error(self, on_error: impl FnOnce() + 'c) -> Self {
        Self {
            on_error: Some(Box::new(on_error)),
            ..self
        }
    }
}

impl fmt::Debug for Callbacks<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_pass", &self.on_pass.is_some())
            .field("on_fail", &self.on_fail.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
