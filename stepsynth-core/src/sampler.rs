use stepsynth_types::InputSnapshot;

use crate::hal::{AnalogIn, DigitalIn, DirectionSource};

/// Every input the main loop looks at, read once per pass.
pub struct InputSampler {
    sine_volume: Box<dyn AnalogIn>,
    square_volume: Box<dyn AnalogIn>,
    playback_speed: Box<dyn AnalogIn>,
    button: Box<dyn DigitalIn>,
    joystick: Box<dyn DirectionSource>,
}

impl InputSampler {
    pub fn new(
        sine_volume: Box<dyn AnalogIn>,
        square_volume: Box<dyn AnalogIn>,
        playback_speed: Box<dyn AnalogIn>,
        button: Box<dyn DigitalIn>,
        joystick: Box<dyn DirectionSource>,
    ) -> Self {
        Self {
            sine_volume,
            square_volume,
            playback_speed,
            button,
            joystick,
        }
    }

    pub fn sample(&mut self) -> InputSnapshot {
        InputSnapshot {
            sine_volume: self.sine_volume.read().clamp(0.0, 1.0),
            square_volume: self.square_volume.read().clamp(0.0, 1.0),
            direction: self.joystick.direction(),
            button_level: self.button.read(),
            playback_speed: self.playback_speed.read().clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use stepsynth_types::Direction;

    struct Counting(Rc<Cell<u32>>, f32);

    impl AnalogIn for Counting {
        fn read(&mut self) -> f32 {
            self.0.set(self.0.get() + 1);
            self.1
        }
    }

    struct Level(bool);

    impl DigitalIn for Level {
        fn read(&mut self) -> bool {
            self.0
        }
    }

    struct Stick(Direction);

    impl DirectionSource for Stick {
        fn direction(&mut self) -> Direction {
            self.0
        }
    }

    #[test]
    fn test_reads_each_input_once_and_clamps() {
        let reads = Rc::new(Cell::new(0));
        let mut sampler = InputSampler::new(
            Box::new(Counting(Rc::clone(&reads), 1.3)),
            Box::new(Counting(Rc::clone(&reads), -0.1)),
            Box::new(Counting(Rc::clone(&reads), 0.5)),
            Box::new(Level(false)),
            Box::new(Stick(Direction::East)),
        );
        let snap = sampler.sample();
        assert_eq!(reads.get(), 3);
        assert_eq!(snap.sine_volume, 1.0);
        assert_eq!(snap.square_volume, 0.0);
        assert_eq!(snap.playback_speed, 0.5);
        assert!(snap.button_pressed());
        assert_eq!(snap.direction, Direction::East);
    }
}
