use std::{
    cell::{Cell, Ref, RefCell, RefMut},
    fmt, io,
    panic::Location,
    time::Instant,
};

use log::{debug, warn};

use crate::{
    ChainView,
    assertion::Assertion,
    error::{ChainError, ErrorRecord},
    kind::{Kind, classify},
    panic::{self, BodyResult, Caught},
    reporter::{Reporter, console::ConsoleReporter},
    trace::{self, Origin, TraceFilter},
    tree::{NodeId, Tree},
    value::Value,
};

/// Name of the group every tree starts with.
pub const ROOT_NAME: &str = "root";

/// An assertion engine.
///
/// The engine owns the result tree, the cursor pointing at the group whose
/// body is currently executing, and the reporter that renders results when a
/// chain is [done](ChainView::done).
///
/// Every fluent operation is available on the engine itself, which starts a
/// chain at the root view:
///
/// ```
/// use testit::{Testit, args, reporter::no::NoReporter};
///
/// let test = Testit::new().with_reporter(NoReporter);
/// test.group("numbers", || {
///     test.it(args![1, 1]);
///     test.is_type(args![2, "number"]);
/// });
/// assert_eq!(test.group_named("numbers").unwrap().result(), Some(true));
/// ```
pub struct Testit {
    tree: RefCell<Tree>,
    cursor: Cell<NodeId>,
    reporter: RefCell<Box<dyn Reporter>>,
    trace_filter: TraceFilter,
    started: Instant,
    root_timed: Cell<bool>,
}

impl Default for Testit {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Testit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Testit")
            .field("tree", &self.tree)
            .field("cursor", &self.cursor.get())
            .field("trace_filter", &self.trace_filter)
            .field("root_timed", &self.root_timed.get())
            .finish_non_exhaustive()
    }
}

impl Testit {
    /// An engine reporting to stdout.
    pub fn new() -> Self {
        let tree = Tree::new(ROOT_NAME);
        let root = tree.root();
        Self {
            tree: RefCell::new(tree),
            cursor: Cell::new(root),
            reporter: RefCell::new(Box::new(ConsoleReporter::default())),
            trace_filter: TraceFilter::default(),
            started: Instant::now(),
            root_timed: Cell::new(false),
        }
    }

    pub fn with_reporter(self, reporter: impl Reporter + 'static) -> Self {
        Self {
            reporter: RefCell::new(Box::new(reporter)),
            ..self
        }
    }

    pub fn with_trace_filter(self, trace_filter: TraceFilter) -> Self {
        Self {
            trace_filter,
            ..self
        }
    }

    /// The view every chain starts from: no current node, no trace.
    pub fn chain(&self) -> ChainView<'_> {
        ChainView::new(self)
    }

    pub fn root(&self) -> NodeId {
        self.tree.borrow().root()
    }

    /// The group declarations currently land in.
    pub fn cursor(&self) -> NodeId {
        self.cursor.get()
    }

    /// Borrow the result tree.
    ///
    /// # Panics
    /// If held while a chain operation runs.
    pub fn tree(&self) -> Ref<'_, Tree> {
        self.tree.borrow()
    }

    pub fn trace_filter(&self) -> &TraceFilter {
        &self.trace_filter
    }

    #[track_caller]
    pub fn group<F, R>(&self, name: &str, body: F) -> ChainView<'_>
    where
        F: FnOnce() -> R,
        R: Into<BodyResult>,
    {
        self.chain().group(name, body)
    }

    #[track_caller]
    pub fn group_named(&self, name: &str) -> Result<ChainView<'_>, ChainError> {
        self.chain().group_named(name)
    }

    #[track_caller]
    pub fn it(&self, args: Vec<Value>) -> ChainView<'_> {
        self.chain().it(args)
    }

    #[track_caller]
    pub fn them(&self, args: Vec<Value>) -> ChainView<'_> {
        self.chain().them(args)
    }

    #[track_caller]
    pub fn is_type(&self, args: Vec<Value>) -> ChainView<'_> {
        self.chain().is_type(args)
    }

    #[track_caller]
    pub fn types(&self, args: Vec<Value>) -> ChainView<'_> {
        self.chain().types(args)
    }

    #[track_caller]
    pub fn assert(&self, assertion: Assertion, args: Vec<Value>) -> ChainView<'_> {
        self.chain().assert(assertion, args)
    }

    pub fn time(&self) -> ChainView<'_> {
        self.chain().time()
    }

    pub fn exclude(&self) -> ChainView<'_> {
        self.chain().exclude()
    }

    /// Report the whole tree.
    pub fn done(&self) {
        self.chain().done()
    }

    /// Hand a group straight to the reporter.
    pub fn print_group(&self, id: NodeId) -> io::Result<()> {
        let tree = self.tree.borrow();
        let group = tree.group(id).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("{id:?} is not a group"))
        })?;
        self.reporter.borrow_mut().render_group(group)
    }

    /// Hand a test straight to the reporter.
    pub fn print_test(&self, id: NodeId) -> io::Result<()> {
        let tree = self.tree.borrow();
        let test = tree.test(id).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("{id:?} is not a test"))
        })?;
        self.reporter.borrow_mut().render_test(test)
    }

    /// Dump raw values through the reporter.
    pub fn print(&self, values: &[Value]) -> io::Result<()> {
        self.reporter.borrow_mut().print(values)
    }

    pub fn kind_of(&self, value: &Value) -> Kind {
        classify(value)
    }

    /// The current stack, filtered like every other trace the engine stores.
    pub fn trace(&self, kind: &str) -> Option<String> {
        trace::capture(kind, &self.trace_filter)
    }

    pub(crate) fn tree_mut(&self) -> RefMut<'_, Tree> {
        self.tree.borrow_mut()
    }

    /// The group a declaration made from a view on `node` lands in.
    pub(crate) fn container(&self, node: Option<NodeId>) -> NodeId {
        match node {
            Some(id) if self.tree.borrow().node(id).is_group() => id,
            _ => self.cursor.get(),
        }
    }

    /// Create or re-enter the group `name` in `container` and run `body` in it.
    pub(crate) fn make_group<F, R>(
        &self,
        container: NodeId,
        name: &str,
        body: F,
        excluded: bool,
    ) -> NodeId
    where
        F: FnOnce() -> R,
        R: Into<BodyResult>,
    {
        let started = Instant::now();
        let (id, existed) = {
            let mut tree = self.tree.borrow_mut();
            let (id, existed) = match tree.find_group(container, name) {
                Some(id) => (id, true),
                None => (tree.add_group(container, name), false),
            };
            tree.reopen(id, container);
            (id, existed)
        };
        match existed {
            true => debug!("re-entering group {name:?} ({id:?})"),
            false => debug!("created group {name:?} ({id:?}) in {container:?}"),
        }

        let previous = self.cursor.replace(id);
        let outcome = panic::contain(body);
        self.cursor.set(previous);

        let record = match outcome {
            Ok(()) => None,
            Err(Caught::Returned(cause)) => Some(ErrorRecord::from_value(cause, &self.trace_filter)),
            Err(Caught::Panicked { message, location }) => {
                Some(ErrorRecord::from_panic(message, location))
            }
        };

        let mut tree = self.tree.borrow_mut();
        if let Some(record) = record {
            debug!("group {name:?} ({id:?}) failed: {record}");
            tree.set_error(id, record);
        }
        tree.add_elapsed(id, started.elapsed());
        if excluded {
            debug!("group {name:?} ({id:?}) excluded from {container:?}");
        } else if !existed {
            tree.attach(container, id);
        }
        tree.recount(id);
        id
    }

    pub(crate) fn lookup_group(&self, container: NodeId, name: &str) -> Result<NodeId, ChainError> {
        self.tree
            .borrow()
            .find_group(container, name)
            .ok_or_else(|| ChainError::UnknownGroup {
                name: name.to_string(),
            })
    }

    /// Evaluate `assertion` into a new test in `container`.
    pub(crate) fn make_test(
        &self,
        container: NodeId,
        assertion: Assertion,
        args: Vec<Value>,
        timestamp: Option<Instant>,
        excluded: bool,
    ) -> NodeId {
        let evaluation = assertion.evaluate(&args);
        let error = evaluation
            .error
            .map(|exception| ErrorRecord::from_exception(exception, &self.trace_filter));

        let mut tree = self.tree.borrow_mut();
        let id = tree.add_test(
            container,
            evaluation.description,
            args,
            evaluation.status,
            error,
        );
        if let Some(timestamp) = timestamp {
            tree.set_elapsed(id, timestamp.elapsed());
        }
        if excluded {
            debug!("{assertion} test {id:?} excluded from {container:?}");
        } else {
            tree.attach(container, id);
        }
        tree.recount(container);
        id
    }

    pub(crate) fn view_trace(&self, location: &'static Location<'static>) -> Origin {
        Origin::capture(location, &self.trace_filter)
    }

    /// Stamp the root time on first use, then report `node` or the root.
    pub(crate) fn finalize(&self, node: Option<NodeId>) {
        let root = self.root();
        if !self.root_timed.replace(true) {
            let elapsed = self.started.elapsed();
            debug!("root finished after {elapsed:?}");
            self.tree.borrow_mut().set_elapsed(root, elapsed);
        }

        let target = node.unwrap_or(root);
        let tree = self.tree.borrow();
        if let Err(err) = self.reporter.borrow_mut().render(tree.get(target)) {
            warn!("could not report {target:?}: {err}");
        }
    }
}
