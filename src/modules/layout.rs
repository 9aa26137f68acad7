// Window geometry for the sidebar and window modes, in logical pixels.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Full-height frame docked to the right edge of `monitor`.
pub fn sidebar_frame(monitor: Frame, width: f64) -> Frame {
    let width = width.clamp(1.0, monitor.width.max(1.0));
    Frame {
        x: monitor.x + monitor.width - width,
        y: monitor.y,
        width,
        height: monitor.height,
    }
}

/// Frame of the given size centered on `monitor`, shrunk to fit.
pub fn centered_frame(monitor: Frame, width: f64, height: f64) -> Frame {
    let width = width.clamp(1.0, monitor.width.max(1.0));
    let height = height.clamp(1.0, monitor.height.max(1.0));
    Frame {
        x: monitor.x + (monitor.width - width) / 2.0,
        y: monitor.y + (monitor.height - height) / 2.0,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SCREEN: Frame = Frame {
        x: 0.0,
        y: 0.0,
        width: 1920.0,
        height: 1080.0,
    };

    #[test]
    fn test_sidebar_docks_right() {
        let frame = sidebar_frame(SCREEN, 420.0);
        assert_eq!(frame, Frame { x: 1500.0, y: 0.0, width: 420.0, height: 1080.0 });
    }

    #[test]
    fn test_sidebar_on_secondary_monitor() {
        let second = Frame { x: 1920.0, y: -200.0, width: 1280.0, height: 1024.0 };
        let frame = sidebar_frame(second, 400.0);
        assert_eq!(frame.x, 2800.0);
        assert_eq!(frame.y, -200.0);
    }

    #[rstest]
    #[case(5000.0, 1920.0)]
    #[case(0.0, 1.0)]
    #[case(-10.0, 1.0)]
    fn test_sidebar_width_clamped(#[case] requested: f64, #[case] expected: f64) {
        assert_eq!(sidebar_frame(SCREEN, requested).width, expected);
    }

    #[test]
    fn test_centered_frame() {
        let frame = centered_frame(SCREEN, 1200.0, 800.0);
        assert_eq!(frame, Frame { x: 360.0, y: 140.0, width: 1200.0, height: 800.0 });
    }

    #[test]
    fn test_centered_frame_shrinks_to_fit() {
        let small = Frame { x: 0.0, y: 0.0, width: 1024.0, height: 600.0 };
        let frame = centered_frame(small, 1200.0, 800.0);
        assert_eq!(frame, small);
    }
}
