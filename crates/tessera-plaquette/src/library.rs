//! The plaquette library.
//!
//! Every block template numbers its plaquette classes; a
//! [`PlaquetteContext`] names the family of block being compiled, its
//! boundary bases and the data resets/measurements of the round, and
//! [`descriptions`] maps each class of that family to an RPNG
//! description. Classes without an entry hold the empty plaquette.
//!
//! Class numbers follow the layouts of `tessera-templates`: the memory
//! family uses the qubit template, the junction family the spatial cube
//! template and the pipe family the two-wide border templates, whose
//! plaquettes override the border classes of both endpoint cubes.
//!
//! Stabilizers alternate between two bases in a checkerboard. Every
//! family carries `even`, the basis measured on cells whose row plus
//! column is even; the other cells measure its flip.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use tessera_ir::{Basis, DataBasis};

use crate::error::PlaquetteResult;
use crate::plaquette::{Plaquette, Timing};
use crate::rpng::{DataEnd, Rpng, RpngCorner};

/// Axis of a spatial pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpatialAxis {
    X,
    Y,
}

impl fmt::Display for SpatialAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpatialAxis::X => write!(f, "x"),
            SpatialAxis::Y => write!(f, "y"),
        }
    }
}

/// Side of a cube a spatial pipe leaves from, in template orientation
/// (`Up` is towards negative `y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JunctionArm {
    Up,
    Down,
    Left,
    Right,
}

impl JunctionArm {
    pub const ALL: [JunctionArm; 4] = [
        JunctionArm::Up,
        JunctionArm::Down,
        JunctionArm::Left,
        JunctionArm::Right,
    ];

    pub fn axis(self) -> SpatialAxis {
        match self {
            JunctionArm::Left | JunctionArm::Right => SpatialAxis::X,
            JunctionArm::Up | JunctionArm::Down => SpatialAxis::Y,
        }
    }

    fn bit(self) -> u8 {
        match self {
            JunctionArm::Up => 1,
            JunctionArm::Down => 2,
            JunctionArm::Left => 4,
            JunctionArm::Right => 8,
        }
    }
}

impl fmt::Display for JunctionArm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JunctionArm::Up => "up",
            JunctionArm::Down => "down",
            JunctionArm::Left => "left",
            JunctionArm::Right => "right",
        };
        write!(f, "{name}")
    }
}

/// A set of junction arms.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct ArmSet(u8);

impl ArmSet {
    pub const EMPTY: ArmSet = ArmSet(0);

    pub fn contains(self, arm: JunctionArm) -> bool {
        self.0 & arm.bit() != 0
    }

    pub fn insert(&mut self, arm: JunctionArm) {
        self.0 |= arm.bit();
    }

    #[must_use]
    pub fn with(mut self, arm: JunctionArm) -> Self {
        self.insert(arm);
        self
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = JunctionArm> {
        JunctionArm::ALL.into_iter().filter(move |arm| self.contains(*arm))
    }
}

impl FromIterator<JunctionArm> for ArmSet {
    fn from_iter<I: IntoIterator<Item = JunctionArm>>(iter: I) -> Self {
        let mut set = ArmSet::EMPTY;
        for arm in iter {
            set.insert(arm);
        }
        set
    }
}

impl fmt::Display for ArmSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        let names: Vec<String> = self.iter().map(|arm| arm.to_string()).collect();
        write!(f, "{}", names.join("+"))
    }
}

/// What sits at one end of a spatial pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipeEnd {
    /// A cube with walls `x` (normal to `x`) and `y`.
    Cube { x: Basis, y: Basis },
    /// A spatial junction whose walls all carry `walls`.
    Junction { walls: Basis },
}

impl PipeEnd {
    pub fn is_junction(self) -> bool {
        matches!(self, PipeEnd::Junction { .. })
    }
}

impl fmt::Display for PipeEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipeEnd::Cube { x, y } => write!(f, "{x}{y}"),
            PipeEnd::Junction { walls } => write!(f, "junction {walls}"),
        }
    }
}

/// Family of plaquettes, one per kind of block the compiler emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaquetteFamily {
    /// A cube with walls `x` (normal to `x`) and `y`.
    Memory { x: Basis, y: Basis, even: Basis },
    /// A spatial junction with walls `walls` and spatial pipes on the
    /// sides in `arms`.
    ///
    /// `hadamard_arms` are the arms whose Hadamard pipe has the junction
    /// at its head: the seam corners across them take the tail's basis.
    SpatialJunction {
        walls: Basis,
        even: Basis,
        arms: ArmSet,
        hadamard_arms: ArmSet,
    },
    /// A spatial pipe along `axis`, `even` being the head's checkerboard.
    /// A Hadamard pipe flips the checkerboard on its tail side.
    SpatialPipe {
        axis: SpatialAxis,
        hadamard: bool,
        even: Basis,
        head: PipeEnd,
        tail: PipeEnd,
    },
}

impl PlaquetteFamily {
    /// Junctions, and pipes touching one, need the 8-moment schedule.
    pub fn timing(&self) -> Timing {
        match self {
            PlaquetteFamily::SpatialJunction { .. } => Timing::Extended,
            PlaquetteFamily::SpatialPipe { head, tail, .. }
                if head.is_junction() || tail.is_junction() =>
            {
                Timing::Extended
            }
            _ => Timing::Regular,
        }
    }
}

impl fmt::Display for PlaquetteFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaquetteFamily::Memory { x, y, even } => write!(f, "memory({x}{y}, even {even})"),
            PlaquetteFamily::SpatialJunction {
                walls,
                even,
                arms,
                hadamard_arms,
            } => write!(
                f,
                "junction({walls}, even {even}, arms {arms}, hadamard {hadamard_arms})"
            ),
            PlaquetteFamily::SpatialPipe {
                axis,
                hadamard,
                even,
                head,
                tail,
            } => {
                let prefix = if *hadamard { "hadamard-pipe" } else { "pipe" };
                write!(f, "{prefix}-{axis}({head} | {tail}, even {even})")
            }
        }
    }
}

/// Everything needed to pick the plaquettes of one round of one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaquetteContext {
    pub family: PlaquetteFamily,
    /// Basis of the data qubit resets, if the round resets.
    pub reset: Option<DataBasis>,
    /// Basis of the data qubit measurements, if the round measures.
    pub measurement: Option<DataBasis>,
    /// The round ends in a transversal Hadamard instead of measurements.
    pub hadamard: bool,
}

impl PlaquetteContext {
    /// A round without data resets or measurements.
    pub fn new(family: PlaquetteFamily) -> Self {
        Self {
            family,
            reset: None,
            measurement: None,
            hadamard: false,
        }
    }

    #[must_use]
    pub fn with_reset(mut self, basis: Option<DataBasis>) -> Self {
        self.reset = basis;
        self
    }

    #[must_use]
    pub fn with_measurement(mut self, basis: Option<DataBasis>) -> Self {
        self.measurement = basis;
        self
    }

    #[must_use]
    pub fn with_hadamard(mut self, hadamard: bool) -> Self {
        self.hadamard = hadamard;
        self
    }

    pub fn timing(&self) -> Timing {
        self.family.timing()
    }

    pub fn is_extended(&self) -> bool {
        self.timing() == Timing::Extended
    }

    fn data_end(&self) -> Option<DataEnd> {
        if self.hadamard {
            Some(DataEnd::Hadamard)
        } else {
            self.measurement.map(DataEnd::Measure)
        }
    }
}

// Corner masks, `[top-left, top-right, bottom-left, bottom-right]`.
const ALL: [bool; 4] = [true; 4];
const TOP: [bool; 4] = [true, true, false, false];
const BOTTOM: [bool; 4] = [false, false, true, true];
const LEFT: [bool; 4] = [true, false, true, false];
const RIGHT: [bool; 4] = [false, true, false, true];

/// Horizontal sweep: top-left, top-right, bottom-left, bottom-right.
const Z_ORDER: [u8; 4] = [1, 2, 3, 4];
/// Vertical sweep: top-left, bottom-left, top-right, bottom-right.
const N_ORDER: [u8; 4] = [1, 3, 2, 4];

/// Interaction pattern of one plaquette before data resets and
/// measurements are attached. Step `0` marks a corner without
/// interaction.
#[derive(Debug, Clone, Copy)]
struct Shape {
    steps: [u8; 4],
    bases: [Basis; 4],
    ends: [bool; 4],
}

impl Shape {
    fn new(steps: [u8; 4], basis: Basis) -> Self {
        Self {
            steps,
            bases: [basis; 4],
            ends: ALL,
        }
    }

    /// Keep only the interactions of the corners in `mask`.
    fn on(mut self, mask: [bool; 4]) -> Self {
        for (step, keep) in self.steps.iter_mut().zip(mask) {
            if !keep {
                *step = 0;
            }
        }
        self
    }

    /// Restrict data resets and measurements to the corners in `mask`.
    fn ends_on(mut self, mask: [bool; 4]) -> Self {
        self.ends = mask;
        self
    }

    /// Flip the Pauli of the corners in `mask`.
    fn flipped_on(mut self, mask: [bool; 4]) -> Self {
        for (basis, flip) in self.bases.iter_mut().zip(mask) {
            *basis = basis.flipped_if(flip);
        }
        self
    }

    fn describe(&self, reset: Option<DataBasis>, end: Option<DataEnd>) -> PlaquetteResult<Rpng> {
        let mut corners = [RpngCorner::EMPTY; 4];
        for (i, corner) in corners.iter_mut().enumerate() {
            if self.steps[i] == 0 {
                continue;
            }
            corner.pauli = Some(self.bases[i]);
            corner.step = Some(self.steps[i]);
            if self.ends[i] {
                corner.reset = reset;
                corner.end = end;
            }
        }
        Rpng::new(corners)
    }
}

/// Regular schedule of a cube whose `y` walls carry `y`: plaquettes of
/// that basis sweep horizontally, the others vertically.
fn regular(basis: Basis, y: Basis) -> [u8; 4] {
    if basis == y { Z_ORDER } else { N_ORDER }
}

fn memory_shapes(x: Basis, y: Basis, even: Basis) -> Vec<(usize, Shape)> {
    let odd = even.flipped();
    // Walls only hold the cells measuring their own basis.
    let top = if even == y { 6 } else { 5 };
    let bottom = if even == y { 13 } else { 14 };
    let left = if even == x { 8 } else { 7 };
    let right = if even == x { 11 } else { 12 };
    vec![
        (9, Shape::new(regular(even, y), even)),
        (10, Shape::new(regular(odd, y), odd)),
        (top, Shape::new(regular(y, y), y).on(BOTTOM)),
        (bottom, Shape::new(regular(y, y), y).on(TOP)),
        (left, Shape::new(regular(x, y), x).on(RIGHT)),
        (right, Shape::new(regular(x, y), x).on(LEFT)),
    ]
}

/// Bulk hooks of a junction: the fifth step goes last on the bottom-right
/// corner, after a horizontal or a vertical sweep.
const H_HOOK: [u8; 4] = [1, 2, 3, 5];
const V_HOOK: [u8; 4] = [1, 4, 3, 5];

/// Bulk classes of the spatial cube template: class, odd parity and the
/// quadrant the class belongs to.
const JUNCTION_BULK: [(usize, bool, JunctionArm); 12] = [
    (5, false, JunctionArm::Up),
    (6, true, JunctionArm::Up),
    (7, true, JunctionArm::Down),
    (8, false, JunctionArm::Down),
    (13, false, JunctionArm::Up),
    (14, false, JunctionArm::Right),
    (15, false, JunctionArm::Down),
    (16, false, JunctionArm::Left),
    (17, true, JunctionArm::Up),
    (18, true, JunctionArm::Right),
    (19, true, JunctionArm::Down),
    (20, true, JunctionArm::Left),
];

/// Bulk cells next to a convex corner of the junction: the sides they
/// touch and their steps without the outer corner.
const JUNCTION_CONVEX: [(usize, [JunctionArm; 2], [u8; 4]); 4] = [
    (5, [JunctionArm::Up, JunctionArm::Left], [0, 2, 3, 5]),
    (6, [JunctionArm::Up, JunctionArm::Right], [1, 0, 3, 5]),
    (7, [JunctionArm::Down, JunctionArm::Left], [1, 2, 0, 4]),
    (8, [JunctionArm::Down, JunctionArm::Right], [1, 3, 2, 0]),
];

/// Border classes of a side without arm: the class of its even cells,
/// the class of its odd cells and the wall steps.
const JUNCTION_WALLS: [(JunctionArm, usize, usize, [u8; 4]); 4] = [
    (JunctionArm::Up, 10, 9, [0, 0, 3, 5]),
    (JunctionArm::Down, 23, 24, [2, 1, 0, 0]),
    (JunctionArm::Left, 12, 11, [0, 2, 0, 4]),
    (JunctionArm::Right, 21, 22, [1, 0, 2, 0]),
];

/// A corner cell of the spatial cube template.
struct JunctionCorner {
    class: usize,
    odd: bool,
    sides: [JunctionArm; 2],
    /// Steps with an arm on both sides.
    concave: [u8; 4],
    /// Steps with a single arm, keyed by the side without one.
    seam: [(JunctionArm, [u8; 4]); 2],
    /// Arm region each data corner lies in, if outside the patch.
    regions: [Option<JunctionArm>; 4],
}

const JUNCTION_CORNERS: [JunctionCorner; 4] = [
    JunctionCorner {
        class: 1,
        odd: false,
        sides: [JunctionArm::Up, JunctionArm::Left],
        concave: [0, 3, 4, 5],
        seam: [
            (JunctionArm::Left, [0, 3, 0, 4]),
            (JunctionArm::Up, [0, 0, 3, 5]),
        ],
        regions: [
            Some(JunctionArm::Left),
            Some(JunctionArm::Up),
            Some(JunctionArm::Left),
            None,
        ],
    },
    JunctionCorner {
        class: 2,
        odd: true,
        sides: [JunctionArm::Up, JunctionArm::Right],
        concave: [1, 0, 2, 5],
        seam: [
            (JunctionArm::Right, [1, 0, 2, 0]),
            (JunctionArm::Up, [0, 0, 3, 5]),
        ],
        regions: [
            Some(JunctionArm::Up),
            Some(JunctionArm::Right),
            None,
            Some(JunctionArm::Right),
        ],
    },
    JunctionCorner {
        class: 3,
        odd: true,
        sides: [JunctionArm::Down, JunctionArm::Left],
        concave: [1, 2, 0, 4],
        seam: [
            (JunctionArm::Down, [1, 2, 0, 0]),
            (JunctionArm::Left, [0, 2, 0, 4]),
        ],
        regions: [
            Some(JunctionArm::Left),
            None,
            Some(JunctionArm::Left),
            Some(JunctionArm::Down),
        ],
    },
    JunctionCorner {
        class: 4,
        odd: false,
        sides: [JunctionArm::Down, JunctionArm::Right],
        concave: [1, 2, 4, 0],
        seam: [
            (JunctionArm::Down, [1, 2, 0, 0]),
            (JunctionArm::Right, [1, 0, 2, 0]),
        ],
        regions: [
            None,
            Some(JunctionArm::Right),
            Some(JunctionArm::Down),
            Some(JunctionArm::Right),
        ],
    },
];

/// Hook of a bulk plaquette in `quadrant`. A quadrant facing an arm
/// sweeps along the arm, one facing a wall sweeps along the wall; cells
/// of the other basis turn the other way.
fn junction_hook(basis: Basis, walls: Basis, quadrant: JunctionArm, arms: ArmSet) -> [u8; 4] {
    let facing_arm = arms.contains(quadrant);
    let vertical = match quadrant.axis() {
        SpatialAxis::Y => facing_arm,
        SpatialAxis::X => !facing_arm,
    };
    if vertical != (basis != walls) {
        V_HOOK
    } else {
        H_HOOK
    }
}

fn junction_shapes(
    walls: Basis,
    even: Basis,
    arms: ArmSet,
    hadamard_arms: ArmSet,
) -> Vec<(usize, Shape)> {
    let mut shapes = Vec::new();

    for (class, odd, quadrant) in JUNCTION_BULK {
        let basis = even.flipped_if(odd);
        let convex = JUNCTION_CONVEX
            .iter()
            .find(|(c, sides, _)| *c == class && sides.iter().all(|side| !arms.contains(*side)))
            .filter(|_| basis == walls);
        let steps = match convex {
            Some((_, _, steps)) => *steps,
            None => junction_hook(basis, walls, quadrant, arms),
        };
        shapes.push((class, Shape::new(steps, basis)));
    }

    for (side, even_class, odd_class, steps) in JUNCTION_WALLS {
        if !arms.contains(side) {
            let class = if even == walls { even_class } else { odd_class };
            shapes.push((class, Shape::new(steps, walls)));
        }
    }

    for corner in &JUNCTION_CORNERS {
        if even.flipped_if(corner.odd) != walls {
            continue;
        }
        let present: Vec<JunctionArm> =
            corner.sides.into_iter().filter(|side| arms.contains(*side)).collect();
        let steps = match present.len() {
            2 => corner.concave,
            1 => match corner.seam.iter().find(|(absent, _)| !arms.contains(*absent)) {
                Some((_, steps)) => *steps,
                None => continue,
            },
            _ => continue,
        };
        let flips = corner
            .regions
            .map(|region| region.is_some_and(|arm| hadamard_arms.contains(arm)));
        // Only the corner inside the patch belongs to the junction.
        let mut inner = [false; 4];
        inner[3 - (corner.class - 1)] = true;
        shapes.push((
            corner.class,
            Shape::new(steps, walls).flipped_on(flips).ends_on(inner),
        ));
    }

    shapes
}

/// Cells of a two-wide border template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Along {
    First,
    Middle,
    Last,
}

/// Class, head side, place along the pipe and odd parity of each cell of
/// the border template of a pipe along `x`.
const VERTICAL_BORDER_CELLS: [(usize, bool, Along, bool); 8] = [
    (1, true, Along::First, true),
    (2, false, Along::First, false),
    (3, true, Along::Last, false),
    (4, false, Along::Last, true),
    (5, true, Along::Middle, false),
    (6, true, Along::Middle, true),
    (7, false, Along::Middle, true),
    (8, false, Along::Middle, false),
];

/// Same for the border template of a pipe along `y`.
const HORIZONTAL_BORDER_CELLS: [(usize, bool, Along, bool); 8] = [
    (1, true, Along::First, true),
    (2, true, Along::Last, false),
    (3, false, Along::First, false),
    (4, false, Along::Last, true),
    (5, true, Along::Middle, false),
    (6, true, Along::Middle, true),
    (7, false, Along::Middle, true),
    (8, false, Along::Middle, false),
];

/// Junction-side steps of a pipe leaving the junction through `arm`, for
/// cells measuring the walls' basis or its flip.
fn arm_steps(arm: JunctionArm, measures_walls: bool) -> [u8; 4] {
    match (arm, measures_walls) {
        (JunctionArm::Left, true) => [1, 2, 3, 5],
        (JunctionArm::Left, false) => [1, 4, 2, 5],
        (JunctionArm::Right, true) => [1, 2, 3, 5],
        (JunctionArm::Right, false) => [1, 4, 3, 5],
        (JunctionArm::Up, true) => [1, 3, 5, 4],
        (JunctionArm::Up, false) => [1, 2, 3, 6],
        (JunctionArm::Down, true) => [1, 4, 2, 5],
        (JunctionArm::Down, false) => [1, 2, 3, 5],
    }
}

fn pipe_shapes(
    axis: SpatialAxis,
    hadamard: bool,
    even: Basis,
    head: PipeEnd,
    tail: PipeEnd,
) -> Vec<(usize, Shape)> {
    // Seam corners of head and tail cells, masks of the first and last
    // cells, and the arm each end sees the pipe through.
    let (cells, head_seam, tail_seam, first, last, head_arm, tail_arm) = match axis {
        SpatialAxis::X => (
            VERTICAL_BORDER_CELLS,
            RIGHT,
            LEFT,
            BOTTOM,
            TOP,
            JunctionArm::Right,
            JunctionArm::Left,
        ),
        SpatialAxis::Y => (
            HORIZONTAL_BORDER_CELLS,
            BOTTOM,
            TOP,
            RIGHT,
            LEFT,
            JunctionArm::Down,
            JunctionArm::Up,
        ),
    };

    let mut shapes = Vec::new();
    for (class, at_head, along, odd) in cells {
        let (end, side_even, seam, arm) = if at_head {
            (head, even, head_seam, head_arm)
        } else {
            (tail, even.flipped_if(hadamard), tail_seam, tail_arm)
        };
        let own = side_even.flipped_if(odd);
        let shape = match (end, along) {
            // A junction keeps its own corner cells.
            (PipeEnd::Junction { .. }, Along::First | Along::Last) => continue,
            (PipeEnd::Junction { walls }, Along::Middle) => {
                Shape::new(arm_steps(arm, own == walls), own)
            }
            (PipeEnd::Cube { x, y }, Along::First | Along::Last) => {
                let wall = match axis {
                    SpatialAxis::X => y,
                    SpatialAxis::Y => x,
                };
                if own != wall {
                    continue;
                }
                let mask = if along == Along::First { first } else { last };
                Shape::new(regular(own, y), own).on(mask)
            }
            (PipeEnd::Cube { y, .. }, Along::Middle) => Shape::new(regular(own, y), own),
        };
        let flips = if hadamard && at_head { seam } else { [false; 4] };
        shapes.push((class, shape.flipped_on(flips).ends_on(seam)));
    }
    shapes
}

/// Class to description map for `context`.
pub fn descriptions(context: &PlaquetteContext) -> PlaquetteResult<BTreeMap<usize, Rpng>> {
    let shapes = match context.family {
        PlaquetteFamily::Memory { x, y, even } => memory_shapes(x, y, even),
        PlaquetteFamily::SpatialJunction {
            walls,
            even,
            arms,
            hadamard_arms,
        } => junction_shapes(walls, even, arms, hadamard_arms),
        PlaquetteFamily::SpatialPipe {
            axis,
            hadamard,
            even,
            head,
            tail,
        } => pipe_shapes(axis, hadamard, even, head, tail),
    };
    let end = context.data_end();
    shapes
        .into_iter()
        .map(|(class, shape)| Ok((class, shape.describe(context.reset, end)?)))
        .collect()
}

/// The plaquette of `class_index` in `context`.
pub fn plaquette_for(class_index: usize, context: &PlaquetteContext) -> PlaquetteResult<Plaquette> {
    let description = descriptions(context)?
        .remove(&class_index)
        .unwrap_or_else(Rpng::empty);
    Plaquette::from_rpng(&description, context.timing())
}

/// Plaquettes for every class `1..=count`, in class order.
pub fn plaquettes_for(count: usize, context: &PlaquetteContext) -> PlaquetteResult<Vec<Plaquette>> {
    let mut described = descriptions(context)?;
    (1..=count)
        .map(|class| {
            let description = described.remove(&class).unwrap_or_else(Rpng::empty);
            Plaquette::from_rpng(&description, context.timing())
        })
        .collect()
}
