use crate::domain::device::LightState;
use crate::elgato::client::DeviceError;
use crate::elgato::domain::LightsGet;

/// Validates a lights payload and maps it to a confirmed state. A Key Light
/// reports exactly one light; anything outside the documented value ranges is
/// rejected so an invalid payload never reaches the registry.
pub fn map_state(response: &LightsGet) -> Result<LightState, DeviceError> {
    let Some(light) = response.lights.first() else {
        return Err(DeviceError::MalformedResponse("empty lights array".to_string()));
    };

    let on = match light.on {
        0 => false,
        1 => true,
        other => return Err(DeviceError::MalformedResponse(format!("on must be 0 or 1, got {other}"))),
    };

    if !(1..=100).contains(&light.brightness) {
        return Err(DeviceError::MalformedResponse(format!("brightness must be within [1, 100], got {}", light.brightness)));
    }

    Ok(LightState { on, brightness: light.brightness })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elgato::domain::LightGet;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn response(on: u8, brightness: u8) -> LightsGet {
        LightsGet {
            number_of_lights: 1,
            lights: vec![LightGet {
                on,
                brightness,
                temperature: Some(213),
            }],
        }
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    fn maps_the_on_field(#[case] on: u8, #[case] expected: bool) {
        let state = map_state(&response(on, 50)).unwrap();

        assert_eq!(state, LightState { on: expected, brightness: 50 });
    }

    #[rstest]
    #[case(1)]
    #[case(100)]
    fn accepts_brightness_range_bounds(#[case] brightness: u8) {
        let state = map_state(&response(1, brightness)).unwrap();

        assert_eq!(state.brightness, brightness);
    }

    #[rstest]
    #[case(0)]
    #[case(101)]
    #[case(150)]
    fn rejects_out_of_range_brightness(#[case] brightness: u8) {
        let result = map_state(&response(1, brightness));

        assert!(matches!(result, Err(DeviceError::MalformedResponse(_))));
    }

    #[test]
    fn rejects_an_on_value_that_is_not_a_boolean() {
        let result = map_state(&response(2, 50));

        assert!(matches!(result, Err(DeviceError::MalformedResponse(_))));
    }

    #[test]
    fn rejects_an_empty_lights_array() {
        let empty = LightsGet {
            number_of_lights: 0,
            lights: vec![],
        };

        let result = map_state(&empty);

        assert!(matches!(result, Err(DeviceError::MalformedResponse(_))));
    }
}
