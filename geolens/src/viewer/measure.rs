use std::fmt::Debug;

use geolens_types::geo::GeoPoint2d;

use crate::config::MeasureStyle;
use crate::control::{EventPropagation, MouseButton, UserEvent, UserEventHandler};
use crate::layer::Shape;
use crate::surface::MapSurface;
use crate::viewer::InfoText;

/// Mode class set on the map while measuring.
pub const MEASURING_CLASS: &str = "measuring";

/// Points and shapes of an ongoing measurement.
#[derive(Debug)]
pub struct MeasureSession<H> {
    points: Vec<GeoPoint2d>,
    markers: Vec<H>,
    line: Option<H>,
    group: H,
    total: f64,
}

impl<H> MeasureSession<H> {
    fn new(group: H) -> Self {
        Self {
            points: vec![],
            markers: vec![],
            line: None,
            group,
            total: 0.0,
        }
    }

    /// Clicked points in click order.
    pub fn points(&self) -> &[GeoPoint2d] {
        &self.points
    }

    /// Handles of the point markers.
    pub fn markers(&self) -> &[H] {
        &self.markers
    }

    /// Handle of the line connecting the points, if there are at least two of them.
    pub fn line(&self) -> Option<&H> {
        self.line.as_ref()
    }

    /// Handle of the group holding the markers and the line.
    pub fn group(&self) -> &H {
        &self.group
    }

    /// Length of the path through the points in meters.
    pub fn total(&self) -> f64 {
        self.total
    }
}

/// State of the [`MeasureTool`].
#[derive(Debug)]
pub enum MeasureState<H> {
    /// Measurement is off, clicks are ignored.
    Idle,
    /// Clicks add points to the session.
    Measuring(MeasureSession<H>),
}

/// Measures the length of a path the user clicks on the map.
pub struct MeasureTool<H> {
    state: MeasureState<H>,
    style: MeasureStyle,
}

impl<H: Clone + Debug> MeasureTool<H> {
    /// Creates an idle tool that draws with the given style.
    pub fn new(style: MeasureStyle) -> Self {
        Self {
            state: MeasureState::Idle,
            style,
        }
    }

    /// Current state.
    pub fn state(&self) -> &MeasureState<H> {
        &self.state
    }

    /// Returns true if a measurement is in progress.
    pub fn is_measuring(&self) -> bool {
        matches!(self.state, MeasureState::Measuring(_))
    }

    /// The ongoing measurement.
    pub fn session(&self) -> Option<&MeasureSession<H>> {
        match &self.state {
            MeasureState::Measuring(session) => Some(session),
            MeasureState::Idle => None,
        }
    }

    /// Text for the info box. `None` when the box should be hidden.
    pub fn info(&self) -> Option<InfoText> {
        let session = self.session()?;
        if session.points.len() < 2 {
            Some(InfoText::Instructions)
        } else {
            Some(InfoText::Total(session.total))
        }
    }

    /// Starts a new measurement. Does nothing if one is already in progress.
    pub fn start<S>(&mut self, surface: &mut S)
    where
        S: MapSurface<Handle = H>,
    {
        if self.is_measuring() {
            return;
        }

        let group = surface.create_group();
        surface.add_layer(&group);
        surface.set_mode_class(MEASURING_CLASS, true);
        surface.listen_clicks(true);

        self.state = MeasureState::Measuring(MeasureSession::new(group));
        log::debug!("Measurement started");
    }

    /// Finishes the measurement and removes its shapes from the map.
    pub fn stop<S>(&mut self, surface: &mut S)
    where
        S: MapSurface<Handle = H>,
    {
        let MeasureState::Measuring(session) = std::mem::replace(&mut self.state, MeasureState::Idle) else {
            return;
        };

        surface.set_mode_class(MEASURING_CLASS, false);
        surface.listen_clicks(false);
        surface.drop_layer(session.group);

        log::debug!(
            "Measurement finished with {} points, {:.1} m",
            session.points.len(),
            session.total
        );
    }

    /// Starts or stops the measurement. Returns true if measuring after the call.
    pub fn toggle<S>(&mut self, surface: &mut S) -> bool
    where
        S: MapSurface<Handle = H>,
    {
        if self.is_measuring() {
            self.stop(surface);
        } else {
            self.start(surface);
        }

        self.is_measuring()
    }

    /// Adds a point to the measured path. Returns false if not measuring.
    pub fn add_point<S>(&mut self, surface: &mut S, point: GeoPoint2d) -> bool
    where
        S: MapSurface<Handle = H>,
    {
        let MeasureState::Measuring(session) = &mut self.state else {
            return false;
        };

        session.points.push(point);

        let marker = Shape::Marker {
            position: point,
            symbol: self.style.marker,
        };
        match surface.add_shape(&session.group, marker) {
            Ok(handle) => session.markers.push(handle),
            Err(err) => log::warn!("Failed to add measurement marker: {err}"),
        }

        if session.points.len() >= 2 {
            if let Some(line) = session.line.take() {
                surface.remove_shape(&session.group, &line);
            }

            let line = Shape::Polyline {
                points: session.points.clone(),
                symbol: self.style.line.clone(),
            };
            session.line = surface
                .add_shape(&session.group, line)
                .map_err(|err| log::warn!("Failed to add measurement line: {err}"))
                .ok();

            session.total = path_length(surface, &session.points);
        }

        true
    }
}

/// Sum of distances between consecutive points.
fn path_length<S: MapSurface>(surface: &S, points: &[GeoPoint2d]) -> f64 {
    points
        .windows(2)
        .map(|pair| surface.distance(&pair[0], &pair[1]))
        .sum()
}

impl<H, S> UserEventHandler<S> for MeasureTool<H>
where
    H: Clone + Debug,
    S: MapSurface<Handle = H>,
{
    fn handle(&mut self, event: &UserEvent, surface: &mut S) -> EventPropagation {
        if let UserEvent::Click(MouseButton::Left, point) = event {
            if self.add_point(surface, *point) {
                return EventPropagation::Consume;
            }
        }

        EventPropagation::Propagate
    }
}
