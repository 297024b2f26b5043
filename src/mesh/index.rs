//! Handle types for mesh elements.
//!
//! Every element kind is stored in its own generation-checked arena, so a
//! handle is a (slot, version) pair. A handle to a destroyed element stays
//! dead forever, even after its slot has been reused by a later insertion.

use std::fmt;

use slotmap::{new_key_type, Key};

new_key_type! {
    /// Handle to a vertex.
    pub struct VertexId;
    /// Handle to an undirected edge.
    pub struct EdgeId;
    /// Handle to a halfedge.
    pub struct HalfedgeId;
    /// Handle to a face.
    pub struct FaceId;
}

macro_rules! impl_display {
    ($name:ident, $prefix:literal) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_null() {
                    write!(f, "{}(null)", $prefix)
                } else {
                    write!(f, "{}({:?})", $prefix, self.data())
                }
            }
        }
    };
}

impl_display!(VertexId, "V");
impl_display!(EdgeId, "E");
impl_display!(HalfedgeId, "H");
impl_display!(FaceId, "F");

/// The four kinds of mesh element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A vertex.
    Vertex,
    /// An undirected edge.
    Edge,
    /// A halfedge.
    Halfedge,
    /// A face.
    Face,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementKind::Vertex => "vertex",
            ElementKind::Edge => "edge",
            ElementKind::Halfedge => "halfedge",
            ElementKind::Face => "face",
        })
    }
}

/// A handle to any element of a mesh.
///
/// Used wherever an element of unknown kind is tracked, such as the selected
/// or hovered feature of an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    /// A vertex.
    Vertex(VertexId),
    /// An undirected edge.
    Edge(EdgeId),
    /// A halfedge.
    Halfedge(HalfedgeId),
    /// A face.
    Face(FaceId),
}

impl ElementId {
    /// The kind of element this handle points to.
    pub fn kind(self) -> ElementKind {
        match self {
            ElementId::Vertex(_) => ElementKind::Vertex,
            ElementId::Edge(_) => ElementKind::Edge,
            ElementId::Halfedge(_) => ElementKind::Halfedge,
            ElementId::Face(_) => ElementKind::Face,
        }
    }

    /// The vertex handle, if this is a vertex.
    pub fn as_vertex(self) -> Option<VertexId> {
        match self {
            ElementId::Vertex(v) => Some(v),
            _ => None,
        }
    }

    /// The edge handle, if this is an edge.
    pub fn as_edge(self) -> Option<EdgeId> {
        match self {
            ElementId::Edge(e) => Some(e),
            _ => None,
        }
    }

    /// The halfedge handle, if this is a halfedge.
    pub fn as_halfedge(self) -> Option<HalfedgeId> {
        match self {
            ElementId::Halfedge(h) => Some(h),
            _ => None,
        }
    }

    /// The face handle, if this is a face.
    pub fn as_face(self) -> Option<FaceId> {
        match self {
            ElementId::Face(f) => Some(f),
            _ => None,
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementId::Vertex(v) => fmt::Display::fmt(v, f),
            ElementId::Edge(e) => fmt::Display::fmt(e, f),
            ElementId::Halfedge(h) => fmt::Display::fmt(h, f),
            ElementId::Face(face) => fmt::Display::fmt(face, f),
        }
    }
}

impl From<VertexId> for ElementId {
    fn from(v: VertexId) -> Self {
        ElementId::Vertex(v)
    }
}

impl From<EdgeId> for ElementId {
    fn from(e: EdgeId) -> Self {
        ElementId::Edge(e)
    }
}

impl From<HalfedgeId> for ElementId {
    fn from(h: HalfedgeId) -> Self {
        ElementId::Halfedge(h)
    }
}

impl From<FaceId> for ElementId {
    fn from(f: FaceId) -> Self {
        ElementId::Face(f)
    }
}
