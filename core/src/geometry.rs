#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = (other.x - self.x) as f32;
        let dy = (other.y - self.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Moves `distance` pixels from `self` in the direction of `target`.
    pub fn towards(self, target: Point, distance: f32) -> Point {
        let length = self.distance(target);
        if length < f32::EPSILON {
            return target;
        }
        let ratio = distance / length;
        Point::new(
            self.x + ((target.x - self.x) as f32 * ratio) as i32,
            self.y + ((target.y - self.y) as f32 * ratio) as i32,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    Left,
    Right,
    Center,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Right, Lane::Center];

    pub fn opposite(self) -> Lane {
        match self {
            Lane::Left => Lane::Right,
            Lane::Right => Lane::Left,
            Lane::Center => Lane::Center,
        }
    }
}

/// Per-lane lookup, indexed in `Lane::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneTable<T> {
    pub left: T,
    pub right: T,
    pub center: T,
}

impl<T: Copy> LaneTable<T> {
    pub const fn new(left: T, right: T, center: T) -> Self {
        Self {
            left,
            right,
            center,
        }
    }

    pub fn get(&self, lane: Lane) -> T {
        match lane {
            Lane::Left => self.left,
            Lane::Right => self.right,
            Lane::Center => self.center,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Ours,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tower {
    King,
    Left,
    Right,
}

impl Tower {
    pub const ALL: [Tower; 3] = [Tower::King, Tower::Left, Tower::Right];

    pub fn of_lane(lane: Lane) -> Tower {
        match lane {
            Lane::Left => Tower::Left,
            Lane::Right => Tower::Right,
            Lane::Center => Tower::King,
        }
    }
}

/// Battlefield coordinates, in screen pixels. Built once per process and
/// shared read only by every component.
#[derive(Debug, Clone, PartialEq)]
pub struct Zones {
    pub enemy_spawn: LaneTable<Point>,
    pub our_spawn: LaneTable<Point>,
    pub bridge: LaneTable<Point>,
    pub incursion: [(Point, Lane); 2],

    pub enemy_king: Point,
    pub our_king: Point,
    pub enemy_princess: LaneTable<Point>,
    pub our_princess: LaneTable<Point>,

    pub pocket: LaneTable<Point>,
    pub anti_push: LaneTable<Point>,
    pub building_spot: LaneTable<Point>,
    pub support: LaneTable<Point>,
    pub standard: LaneTable<Point>,
    pub lane_front: LaneTable<Point>,
    pub kiting: LaneTable<[Point; 3]>,

    pub elixir_bar: [Point; 10],
    pub emote_button: Point,
    pub emotes: [Point; 4],

    /// Lowest row a counter placement may reach before the king tower.
    pub defense_line: i32,
    /// Bottom right corner of the battlefield.
    pub map_size: Point,
}

impl Default for Zones {
    fn default() -> Self {
        let mut elixir_bar = [Point::default(); 10];
        for (pip, point) in elixir_bar.iter_mut().enumerate() {
            *point = Point::new(160 + pip as i32 * 29, 605);
        }
        Self {
            enemy_spawn: LaneTable::new(
                Point::new(150, 50),
                Point::new(490, 50),
                Point::new(320, 80),
            ),
            our_spawn: LaneTable::new(
                Point::new(150, 520),
                Point::new(490, 520),
                Point::new(320, 490),
            ),
            bridge: LaneTable::new(
                Point::new(150, 285),
                Point::new(490, 285),
                Point::new(320, 285),
            ),
            incursion: [
                (Point::new(110, 430), Lane::Left),
                (Point::new(530, 430), Lane::Right),
            ],
            enemy_king: Point::new(320, 120),
            our_king: Point::new(320, 450),
            enemy_princess: LaneTable::new(
                Point::new(200, 160),
                Point::new(440, 160),
                Point::new(320, 120),
            ),
            our_princess: LaneTable::new(
                Point::new(200, 410),
                Point::new(440, 410),
                Point::new(320, 450),
            ),
            pocket: LaneTable::new(
                Point::new(80, 285),
                Point::new(560, 285),
                Point::new(320, 300),
            ),
            anti_push: LaneTable::new(
                Point::new(200, 350),
                Point::new(440, 350),
                Point::new(320, 360),
            ),
            building_spot: LaneTable::new(
                Point::new(220, 380),
                Point::new(420, 380),
                Point::new(320, 390),
            ),
            support: LaneTable::new(
                Point::new(180, 320),
                Point::new(460, 320),
                Point::new(320, 330),
            ),
            standard: LaneTable::new(
                Point::new(150, 350),
                Point::new(490, 350),
                Point::new(320, 340),
            ),
            lane_front: LaneTable::new(
                Point::new(150, 320),
                Point::new(490, 320),
                Point::new(320, 330),
            ),
            kiting: LaneTable::new(
                [
                    Point::new(100, 400),
                    Point::new(160, 420),
                    Point::new(120, 380),
                ],
                [
                    Point::new(540, 400),
                    Point::new(480, 420),
                    Point::new(520, 380),
                ],
                [
                    Point::new(320, 380),
                    Point::new(280, 400),
                    Point::new(360, 400),
                ],
            ),
            elixir_bar,
            emote_button: Point::new(67, 521),
            emotes: [
                Point::new(124, 419),
                Point::new(182, 420),
                Point::new(255, 411),
                Point::new(312, 423),
            ],
            defense_line: 450,
            map_size: Point::new(640, 640),
        }
    }
}

impl Zones {
    /// Probes scanned for enemy units: spawns and bridges first, then the
    /// incursion spots on our half of the flank lanes.
    pub fn probes(&self) -> Vec<(Point, Lane)> {
        let mut probes = vec![
            (self.enemy_spawn.left, Lane::Left),
            (self.enemy_spawn.right, Lane::Right),
            (self.enemy_spawn.center, Lane::Center),
            (self.bridge.left, Lane::Left),
            (self.bridge.right, Lane::Right),
        ];
        probes.extend(self.incursion.iter().copied());
        probes
    }

    /// Keeps `point` on the battlefield.
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(0, self.map_size.x - 1),
            point.y.clamp(0, self.map_size.y - 1),
        )
    }

    pub fn is_enemy_spawn(&self, point: Point) -> bool {
        Lane::ALL.iter().any(|l| self.enemy_spawn.get(*l) == point)
    }

    pub fn tower(&self, side: Side, tower: Tower) -> Point {
        match (side, tower) {
            (Side::Enemy, Tower::King) => self.enemy_king,
            (Side::Enemy, Tower::Left) => self.enemy_princess.left,
            (Side::Enemy, Tower::Right) => self.enemy_princess.right,
            (Side::Ours, Tower::King) => self.our_king,
            (Side::Ours, Tower::Left) => self.our_princess.left,
            (Side::Ours, Tower::Right) => self.our_princess.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn towards_moves_fixed_distance() {
        let from = Point::new(100, 100);
        let to = Point::new(100, 200);
        assert_eq!(from.towards(to, 40f32), Point::new(100, 140));
    }

    #[test]
    fn clamp_keeps_points_on_the_map() {
        let zones = Zones::default();
        assert_eq!(zones.clamp(Point::new(150, 700)), Point::new(150, 639));
        assert_eq!(zones.clamp(Point::new(-5, 20)), Point::new(0, 20));
        assert_eq!(zones.clamp(Point::new(320, 300)), Point::new(320, 300));
    }

    #[test]
    fn towards_same_point_is_stable() {
        let from = Point::new(100, 100);
        assert_eq!(from.towards(from, 40f32), from);
    }

    #[test]
    fn probes_cover_spawns_bridges_and_incursions() {
        let zones = Zones::default();
        let probes = zones.probes();
        assert_eq!(probes.len(), 7);
        assert_eq!(probes[0], (Point::new(150, 50), Lane::Left));
        assert!(probes.iter().any(|(p, l)| p.y > 400 && *l == Lane::Left));
    }

    #[test]
    fn lane_opposites() {
        assert_eq!(Lane::Left.opposite(), Lane::Right);
        assert_eq!(Lane::Right.opposite(), Lane::Left);
        assert_eq!(Lane::Center.opposite(), Lane::Center);
    }
}
