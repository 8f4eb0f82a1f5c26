/// Estimator control flags shared between the aiding sources.
///
/// Each aiding source writes its own flag once per cycle and reads the flags of the others
/// to resolve conflicts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlStatus {
    /// Satellite position and velocity are being fused.
    pub gps: bool,
    /// Optical flow is being fused.
    pub opt_flow: bool,
    /// External vision position is being fused.
    pub ev_pos: bool,
    /// External vision velocity is being fused.
    pub ev_vel: bool,
    /// Auxiliary velocity is being fused.
    pub aux_vel: bool,
    /// The vehicle is known to be at rest.
    pub vehicle_at_rest: bool,
    /// The gravity vector observation passed its validity gate this cycle.
    pub gravity_vector: bool,
}

impl ControlStatus {
    /// Determines whether any source observing horizontal position or velocity is active.
    ///
    /// Such a source observes tilt errors through the velocity states; gravity fusion would
    /// then fight it whenever the vehicle accelerates.
    #[inline]
    pub fn is_horizontal_aiding_active(&self) -> bool {
        self.gps || self.opt_flow || self.ev_pos || self.ev_vel || self.aux_vel
    }
}
